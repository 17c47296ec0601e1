#![no_main]

use libfuzzer_sys::fuzz_target;

use strassen_core::matrix::Matrix;
use strassen_core::options::Options;
use strassen_core::{naive, strassen};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // Byte 0 picks n in 1..=16, byte 1 the threshold in 1..=16.
    let n = 1usize << (data[0] % 5);
    let threshold = usize::from(data[1] % 16) + 1;
    let entries = &data[2..];

    // Small signed integers keep every partial sum exact in f64.
    let entry = |i: usize| f64::from(entries.get(i).map_or(0, |&b| i8::from_ne_bytes([b]) % 8));
    let mut a = Matrix::<f64>::zeros(n).unwrap();
    let mut b = Matrix::<f64>::zeros(n).unwrap();
    for row in 0..n {
        for col in 0..n {
            let k = row * n + col;
            a.set(row, col, entry(k));
            b.set(row, col, entry(n * n + k));
        }
    }

    let mut expected = Matrix::zeros(n).unwrap();
    naive::multiply(&mut expected, &a, &b, n).unwrap();

    let opts = Options {
        base_case_threshold: threshold,
        ..Options::default()
    };
    let mut c = Matrix::zeros(n).unwrap();
    strassen::multiply_with(&mut c, &a, &b, n, &opts).unwrap();
    assert_eq!(c, expected, "Strassen != naive at n={n}, threshold={threshold}");
});
