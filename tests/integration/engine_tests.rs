//! Dispatch and policy behavior of the engine.

use std::sync::Arc;
use std::thread;

use image::ImageFormat as EncodedFormat;
use proptest::prelude::*;

use image_dims::{Engine, ErrorKind, ImageFormat, ImageSizeError};

use super::test_utils::{encode_rgb, heic_with_properties, iso_box};

// =============================================================================
// Policy
// =============================================================================

#[test]
fn test_disabled_format_reported_not_unsupported() {
    let png = encode_rgb(8, 8, EncodedFormat::Png);
    let engine = Engine::new().with_disabled_formats([ImageFormat::Png]);

    match engine.lookup(&png, None) {
        Err(ImageSizeError::DisabledFormat { format }) => assert_eq!(format, ImageFormat::Png),
        other => panic!("expected DisabledFormat, got {:?}", other),
    }
}

#[test]
fn test_disabling_other_formats_has_no_effect() {
    let gif = encode_rgb(5, 3, EncodedFormat::Gif);
    let engine = Engine::new().with_disabled_formats([ImageFormat::Png, ImageFormat::Svg]);
    assert_eq!(engine.lookup(&gif, None).unwrap().format, ImageFormat::Gif);
}

#[test]
fn test_policy_changes_apply_to_later_calls() {
    let png = encode_rgb(2, 2, EncodedFormat::Png);
    let mut engine = Engine::new();
    assert!(engine.lookup(&png, None).is_ok());

    engine.set_disabled_formats([ImageFormat::Png]);
    assert_eq!(engine.lookup(&png, None).unwrap_err().kind(), ErrorKind::DisabledFormat);

    engine.set_disabled_formats([ImageFormat::Jpeg]);
    assert!(engine.lookup(&png, None).is_ok());
}

#[test]
fn test_filesystem_gate_leaves_buffers_alone() {
    let png = encode_rgb(3, 4, EncodedFormat::Png);
    let mut engine = Engine::new();
    engine.set_filesystem_disabled(true);

    let err = engine.image_size("/no/such/dir/image.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInvocation);
    assert_eq!(engine.image_size(&png).unwrap().dimensions().width, 3);

    engine.set_filesystem_disabled(false);
    let err = engine.image_size("/no/such/dir/image.png").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_registered_formats_static() {
    let all = Engine::new().registered_formats();
    let restricted = Engine::new()
        .with_disabled_formats([ImageFormat::Png, ImageFormat::Heif])
        .registered_formats();
    assert_eq!(all, restricted);
    assert!(all.contains(&ImageFormat::Avif));
    assert_eq!(all.len(), ImageFormat::ALL.len());
}

// =============================================================================
// Dispatch
// =============================================================================

#[test]
fn test_unknown_signature() {
    for data in [&b"hello world"[..], &[0u8; 64][..], &[0xFF; 3][..]] {
        let err = Engine::new().lookup(data, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat, "{:?}", data);
    }
}

#[test]
fn test_concurrent_lookups_share_engine() {
    let engine = Arc::new(Engine::new().with_disabled_formats([ImageFormat::Gif]));
    let png = Arc::new(encode_rgb(21, 13, EncodedFormat::Png));
    let gif = Arc::new(encode_rgb(21, 13, EncodedFormat::Gif));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = Arc::clone(&engine);
            let data = if i % 2 == 0 { Arc::clone(&png) } else { Arc::clone(&gif) };
            thread::spawn(move || engine.lookup(&data, None).map(|r| r.dimensions()))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let outcome = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(outcome.unwrap().width, 21);
        } else {
            assert_eq!(outcome.unwrap_err().kind(), ErrorKind::DisabledFormat);
        }
    }
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_heif_property_with_oversized_box() {
    let mut properties = iso_box(b"ispe", &[0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 200]);
    properties.extend_from_slice(&1u32.to_be_bytes());
    properties.extend_from_slice(b"free");
    properties.extend_from_slice(&u64::MAX.to_be_bytes());

    let size = Engine::new()
        .lookup(&heic_with_properties(&properties), None)
        .unwrap();
    assert_eq!(size.format, ImageFormat::Heic);
    assert_eq!((size.width, size.height), (256, 200));
}

// =============================================================================
// Properties
// =============================================================================

/// One box header with an arbitrary size field, followed by `payload`.
fn raw_box(size32: u32, large_size: u64, kind: [u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = size32.to_be_bytes().to_vec();
    data.extend_from_slice(&kind);
    if size32 == 1 {
        data.extend_from_slice(&large_size.to_be_bytes());
    }
    data.extend_from_slice(payload);
    data
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_lookup_never_panics_and_is_deterministic(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let engine = Engine::new();
        let first = engine.lookup(&data, None);
        let second = engine.lookup(&data, None);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => {
                prop_assert_eq!(a.kind(), b.kind());
                prop_assert_eq!(a.to_string(), b.to_string());
            }
            (a, b) => prop_assert!(false, "diverging results: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn prop_signature_prefix_with_garbage_never_panics(
        prefix in prop::sample::select(vec![
            &b"\x89PNG\r\n\x1a\n"[..],
            &b"\xFF\xD8\xFF"[..],
            &b"GIF89a"[..],
            &b"RIFF\0\0\0\0WEBPVP8"[..],
            &b"\0\0\0\x0cJXL \r\n\x87\n"[..],
            &b"\xFF\x0A"[..],
            &b"\0\0\0\x0cjP  \r\n\x87\n"[..],
            &b"\xFF\x4F\xFF\x51"[..],
            &b"\0\0\0\x18ftypheic"[..],
            &b"II*\0"[..],
            &b"MM\0+"[..],
            &b"8BPS"[..],
            &b"BM"[..],
            &b"DDS "[..],
            &b"icns"[..],
            &b"\xABKTX 11\xBB"[..],
            &b"P7\n"[..],
            &b"\0\0\x01\0\x05\0"[..],
            &b"<svg "[..],
        ]),
        tail in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let mut data = prefix.to_vec();
        data.extend(tail);
        let _ = Engine::new().lookup(&data, None);
    }

    #[test]
    fn prop_heif_property_boxes_never_panic(
        boxes in proptest::collection::vec(
            (
                prop_oneof![Just(0u32), Just(1u32), 8u32..64, any::<u32>()],
                prop_oneof![Just(u64::MAX), any::<u64>(), 0u64..64],
                prop::sample::select(vec![*b"ispe", *b"free", *b"pixi"]),
                proptest::collection::vec(any::<u8>(), 0..24),
            ),
            0..6,
        ),
    ) {
        let mut properties = Vec::new();
        for (size32, large_size, kind, payload) in &boxes {
            properties.extend(raw_box(*size32, *large_size, *kind, payload));
        }
        let data = heic_with_properties(&properties);

        let engine = Engine::new();
        let first = engine.lookup(&data, None);
        let second = engine.lookup(&data, None);
        prop_assert_eq!(first.is_ok(), second.is_ok());
    }
}
