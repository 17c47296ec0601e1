#![no_main]

use libfuzzer_sys::fuzz_target;

use strassen_core::generator::random_matrix;
use strassen_core::options::Options;
use strassen_core::schedule::{NoHook, ScheduleChecker};
use strassen_core::strassen;
use strassen_core::Matrix;
use strassen_memory::BufferPool;

fuzz_target!(|data: &[u8]| {
    if data.len() < 11 {
        return;
    }
    let n = 1usize << (data[0] % 6);
    let threshold = usize::from(data[1] % 8) + 1;
    let poison = f64::from_le_bytes(data[3..11].try_into().unwrap());
    let seed = u64::from(data[2]);

    let a: Matrix<f64> = random_matrix(n, seed).unwrap();
    let b: Matrix<f64> = random_matrix(n, seed + 256).unwrap();
    let opts = Options {
        base_case_threshold: threshold,
        ..Options::default()
    };

    let mut checked = Matrix::zeros(n).unwrap();
    let mut checker = ScheduleChecker::new(n);
    strassen::multiply_hooked(&mut checked, &a, &b, n, &opts, &mut checker).unwrap();
    if let Err(violations) = checker.finish() {
        panic!("n={n} threshold={threshold}: {}", violations[0]);
    }

    // Whatever the scratch held before must not reach the product.
    let pool = BufferPool::new(1 << 12, 1);
    pool.lease(n * n).unwrap().fill(poison);
    let mut pooled = Matrix::zeros(n).unwrap();
    strassen::multiply_pooled(&pool, &mut pooled, &a, &b, n, &opts, NoHook).unwrap();
    assert_eq!(pooled, checked);
});
