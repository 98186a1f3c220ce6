use hypermap::{ArrayConfig, Indexer, MappedArray, Shape};
use std::time::Instant;

fn main() -> hypermap::Result<()> {
    println!("Fill and reload - segmented mapped array");

    let dims = [64u64, 512, 512];
    let config = ArrayConfig::with_segment_shift(22);
    let path = std::env::temp_dir().join("hypermap_fill_and_reload.bin");

    let shape = Shape::new(dims);
    let len = shape.size()?;
    println!("Shape: {dims:?} ({len} elements)");

    let start = Instant::now();
    let mut array = MappedArray::<f32>::create(&path, shape.clone(), config.clone())?;
    println!(
        "Mapped {} segments in {:.3}s",
        array.segment_count(),
        start.elapsed().as_secs_f64()
    );

    // Fill one plane at a time
    let plane_len = (dims[1] * dims[2]) as usize;
    let mut plane = vec![0.0f32; plane_len];
    let start = Instant::now();
    for z in 0..dims[0] {
        for (i, value) in plane.iter_mut().enumerate() {
            *value = z as f32 + i as f32 * 1e-6;
        }
        array.unflatten(&plane, 0, z * plane_len as u64, plane_len)?;
    }
    array.close()?;
    let elapsed = start.elapsed().as_secs_f64();
    println!("Write + flush: {elapsed:.3}s");
    println!(
        "Throughput: {:.1} MB/s",
        (len as f64 * 4.0 / (1024.0 * 1024.0)) / elapsed
    );

    // Verify from a fresh mapping
    let array = MappedArray::<f32>::open(&path, shape, config)?;
    let probe = array.get(&[17, 3, 5])?;
    println!("Value at [17, 3, 5]: {probe}");
    assert_eq!(probe, 17.0 + (3 * 512 + 5) as f32 * 1e-6);
    drop(array);

    std::fs::remove_file(&path)?;
    println!("Cleaned up {}", path.display());
    Ok(())
}
