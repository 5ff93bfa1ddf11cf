use data_loader::DataIndex;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("data");

    println!("Loading catalog and similarity matrix...\n");

    let start = Instant::now();
    let index = DataIndex::load_from_files(data_dir)
        .expect("Failed to load artifacts");
    let elapsed = start.elapsed();

    let n = index.len();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", n);
    println!("Matrix cells: {}", n * n);
    println!("Max asymmetry: {:.6}", index.max_asymmetry());
    println!("\nPerformance: {:.0} cells/second",
             (n * n) as f64 / elapsed.as_secs_f64());
}
