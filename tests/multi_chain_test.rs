//! End-to-end tests for the multi-chain reader.
//!
//! Two synthetic chain files with a warm-up phase are read back in both
//! warm-up modes, checking draw accounting, chain concatenation order, and
//! attribute extraction.

use std::io::Write;

use approx::assert_relative_eq;
use stan_extract::error::ReadError;
use stan_extract::reader::read_multi_chain;
use tempfile::NamedTempFile;

const NUM_SAMPLES: usize = 4;
const NUM_WARMUP: usize = 2;

/// Builds one chain file. Kept draws encode `chain * 1000 + draw` in `lp__`
/// so concatenation order is visible in the result.
fn write_chain(chain: usize) -> NamedTempFile {
    let mut contents = String::new();
    contents.push_str("# model = centered_schools\n");
    contents.push_str("# Step size = 0.84\n");
    contents.push_str(&format!("# num_samples = {} (Default)\n", NUM_SAMPLES));
    contents.push_str(&format!("# num_warmup = {} (Default)\n", NUM_WARMUP));
    contents.push_str("lp__,mu,theta.1,theta.2\n");
    for draw in 0..NUM_WARMUP {
        contents.push_str(&format!(
            "{},-0.5,0.0,0.0\n",
            (chain * 1000 + 500 + draw) as f64
        ));
    }
    contents.push_str("# Adaptation terminated\n");
    for draw in 0..NUM_SAMPLES {
        let tag = (chain * 1000 + draw) as f64;
        contents.push_str(&format!("{},{},{},{}\n", tag, tag + 0.1, tag + 0.2, tag + 0.3));
    }

    let mut file = NamedTempFile::new().expect("Could not create temp file");
    file.write_all(contents.as_bytes())
        .expect("Could not write fixture");
    file
}

#[test]
fn test_chains_concatenate_in_input_order() {
    let chain0 = write_chain(0);
    let chain1 = write_chain(1);
    let paths = [chain0.path(), chain1.path()];

    let (extract, attributes) =
        read_multi_chain::<f64, _>(&paths, false).expect("Expected read to succeed");

    assert_eq!(attributes["num_samples"], "4");
    assert_eq!(attributes["model"], "centered_schools");

    let lp = extract["lp__"].as_scalar().unwrap();
    assert_eq!(lp.len(), 2 * NUM_SAMPLES);

    // Row NUM_SAMPLES of the combined draws is chain 1's first kept draw.
    assert_relative_eq!(lp[NUM_SAMPLES], 1000.0);
    assert_relative_eq!(lp[NUM_SAMPLES - 1], 3.0);

    let theta = extract["theta"].as_vector().unwrap();
    assert_eq!(theta.shape(), &[2, 2 * NUM_SAMPLES]);
    assert_relative_eq!(theta[[1, NUM_SAMPLES]], 1000.3);
}

#[test]
fn test_warmup_rows_are_kept_on_request() {
    let chain0 = write_chain(0);
    let chain1 = write_chain(1);
    let paths = [chain0.path(), chain1.path()];

    let (extract, _) =
        read_multi_chain::<f64, _>(&paths, true).expect("Expected read to succeed");

    let lp = extract["lp__"].as_scalar().unwrap();
    assert_eq!(lp.len(), 2 * (NUM_SAMPLES + NUM_WARMUP));

    // Each chain block starts with its warm-up draws.
    assert_relative_eq!(lp[0], 500.0);
    assert_relative_eq!(lp[NUM_SAMPLES + NUM_WARMUP], 1500.0);
    assert_relative_eq!(lp[NUM_WARMUP], 0.0);
}

#[test]
fn test_reading_one_chain_twice_doubles_the_draws() {
    // Reads are independent; the same file can appear twice in the list.
    let chain = write_chain(2);
    let paths = [chain.path(), chain.path()];

    let (extract, _) =
        read_multi_chain::<f64, _>(&paths, false).expect("Expected read to succeed");
    assert_eq!(extract["mu"].nsamples(), 2 * NUM_SAMPLES);
}

#[test]
fn test_missing_count_attribute_is_fatal() {
    let mut file = NamedTempFile::new().expect("Could not create temp file");
    file.write_all(b"# num_samples = 4\nlp__\n# Adaptation terminated\n0.0\n")
        .expect("Could not write fixture");
    let paths = [file.path()];

    let result = read_multi_chain::<f64, _>(&paths, false);
    assert!(matches!(
        result,
        Err(ReadError::MissingAttribute { key }) if key == "num_warmup"
    ));
}
