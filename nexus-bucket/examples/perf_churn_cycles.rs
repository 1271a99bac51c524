//! Cycle-accurate churn (insert+erase) latency using rdtscp.
//!
//! Compares nexus-bucket vs the slab crate with per-operation cycle counts.
//! Two nexus-bucket runs are taken: one where the target bucket never fills
//! or empties, and one where every pair allocates and frees a bucket.
//!
//! Run with:
//!   cargo build --release --example perf_churn_cycles
//!   taskset -c 0 ./target/release/examples/perf_churn_cycles

use hdrhistogram::Histogram;
use nexus_bucket::BucketStorage;
use std::hint::black_box;

const BLOCK: usize = 64;
const OPS: usize = 1_000_000;

#[inline(always)]
fn rdtscp() -> u64 {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        let mut aux: u32 = 0;
        std::arch::x86_64::__rdtscp(&mut aux)
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        panic!("rdtscp only supported on x86_64");
    }
}

fn print_stats(name: &str, hist: &Histogram<u64>) {
    println!("{}", name);
    println!("  min:  {:>6} cycles", hist.min());
    println!("  p50:  {:>6} cycles", hist.value_at_quantile(0.50));
    println!("  p99:  {:>6} cycles", hist.value_at_quantile(0.99));
    println!("  p999: {:>6} cycles", hist.value_at_quantile(0.999));
    println!("  max:  {:>6} cycles", hist.max());
    println!("  avg:  {:>6.0} cycles", hist.mean());
}

fn bench_bucket(prefill: u64) -> Histogram<u64> {
    let mut storage = BucketStorage::with_block_capacity(BLOCK);
    storage.extend(0..prefill);
    let mut hist = Histogram::<u64>::new(3).unwrap();

    // Warmup
    for i in 0..10_000u64 {
        let pos = storage.insert(i);
        black_box(storage.erase(pos));
    }

    for i in 0..OPS as u64 {
        let start = rdtscp();
        let pos = storage.insert(i);
        black_box(storage.erase(pos));
        let end = rdtscp();
        let _ = hist.record(end.wrapping_sub(start));
    }

    hist
}

fn bench_slab_crate() -> Histogram<u64> {
    let mut slab = slab::Slab::<u64>::with_capacity(BLOCK);
    let mut hist = Histogram::<u64>::new(3).unwrap();

    // Warmup
    for i in 0..10_000u64 {
        let key = slab.insert(i);
        black_box(slab.remove(key));
    }

    for i in 0..OPS as u64 {
        let start = rdtscp();
        let key = slab.insert(i);
        black_box(slab.remove(key));
        let end = rdtscp();
        let _ = hist.record(end.wrapping_sub(start));
    }

    hist
}

fn main() {
    println!("CHURN latency comparison ({} insert+erase pairs)", OPS);
    println!("========================================");
    println!();

    let steady_hist = bench_bucket(BLOCK as u64 - 2);
    let boundary_hist = bench_bucket(0);
    let slab_hist = bench_slab_crate();

    print_stats("nexus-bucket (steady):", &steady_hist);
    println!();
    print_stats("nexus-bucket (bucket boundary):", &boundary_hist);
    println!();
    print_stats("slab:", &slab_hist);
    println!();

    let steady_p50 = steady_hist.value_at_quantile(0.50);
    let boundary_p50 = boundary_hist.value_at_quantile(0.50);
    let slab_p50 = slab_hist.value_at_quantile(0.50);

    println!("----------------------------------------");
    if steady_p50 < slab_p50 {
        println!(
            "nexus-bucket steady p50 is {:.1}% FASTER than slab",
            (1.0 - steady_p50 as f64 / slab_p50 as f64) * 100.0
        );
    } else if steady_p50 > slab_p50 {
        println!(
            "nexus-bucket steady p50 is {:.1}% SLOWER than slab",
            (steady_p50 as f64 / slab_p50 as f64 - 1.0) * 100.0
        );
    } else {
        println!("nexus-bucket steady p50 is EQUAL to slab");
    }
    println!(
        "bucket boundary costs {} extra cycles at p50",
        boundary_p50.saturating_sub(steady_p50)
    );
}
