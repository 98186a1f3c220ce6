//! Durability and on-disk layout of mapped arrays

use hypermap::{ArrayConfig, Error, ErrorKind, MappedArray, Shape};
use tempfile::tempdir;

#[test]
fn flushed_writes_visible_to_fresh_mapping() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cube.bin");
    let config = ArrayConfig::with_segment_shift(2);

    let mut array = MappedArray::<f64>::create(&path, Shape::new([2, 5]), config.clone()).unwrap();
    for i in 0..10 {
        array.set_at(i, i as f64 * 0.5).unwrap();
    }
    array.unflatten(&[100.0, 200.0], 0, 3, 2).unwrap();
    array.flush().unwrap();

    let reopened = MappedArray::<f64>::open(&path, Shape::new([2, 5]), config).unwrap();
    let mut buf = [0.0; 10];
    reopened.flatten(0, &mut buf, 0, 10).unwrap();
    assert_eq!(buf, [0.0, 0.5, 1.0, 100.0, 200.0, 2.5, 3.0, 3.5, 4.0, 4.5]);
    drop(array);
}

#[test]
fn close_persists_and_releases() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ints.bin");

    let mut array =
        MappedArray::<i32>::create(&path, Shape::flat(9), ArrayConfig::with_segment_shift(3))
            .unwrap();
    array.set_at(8, -7).unwrap();
    array.close().unwrap();

    let reopened =
        MappedArray::<i32>::open(&path, Shape::flat(9), ArrayConfig::default()).unwrap();
    assert_eq!(reopened.get_at(8), -7);
    assert_eq!(reopened.segment_count(), 1);
}

#[test]
fn backing_file_is_raw_native_order_elements() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("raw.bin");

    let mut array =
        MappedArray::<u32>::create(&path, Shape::new([3, 3]), ArrayConfig::with_segment_shift(2))
            .unwrap();
    for i in 0..9 {
        array.set_at(i, (i * i) as u32).unwrap();
    }
    array.close().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 9 * 4);
    let values: Vec<u32> = bytes
        .chunks_exact(4)
        .map(bytemuck::pod_read_unaligned)
        .collect();
    assert_eq!(values, vec![0, 1, 4, 9, 16, 25, 36, 49, 64]);
}

#[test]
fn existing_file_contents_are_mapped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("existing.bin");
    let values: Vec<f32> = (0..12).map(|i| i as f32 + 0.25).collect();
    std::fs::write(&path, bytemuck::cast_slice(&values)).unwrap();

    let array =
        MappedArray::<f32>::open(&path, Shape::new([3, 4]), ArrayConfig::with_segment_shift(3))
            .unwrap();
    assert_eq!(array.get(&[2, 3]).unwrap(), 11.25);
    let mut buf = vec![0.0; 12];
    array.flatten(0, &mut buf, 0, 12).unwrap();
    assert_eq!(buf, values);
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = MappedArray::<f64>::open(
        dir.path().join("missing.bin"),
        Shape::flat(4),
        ArrayConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn read_only_handle_fails_to_map() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("readonly.bin");
    std::fs::write(&path, [0u8; 32]).unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let err = MappedArray::<u64>::from_file(&file, Shape::flat(4), ArrayConfig::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn layout_flags_serialize_by_name() {
    let file = tempfile::tempfile().unwrap();
    let array = MappedArray::<i16>::from_file(&file, Shape::new([4, 4]), ArrayConfig::default())
        .unwrap();

    let flags = array.layout_flags();
    for (name, value) in flags.entries() {
        assert!(value, "{name} should be set");
    }
    let json = serde_json::to_value(flags).unwrap();
    assert_eq!(json["aligned"], true);
    assert_eq!(json["c_contiguous"], true);
    assert_eq!(json["owndata"], true);
    assert_eq!(json["writeable"], true);
}
