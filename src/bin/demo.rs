//! A small demo that reads CmdStan chain files and prints the reconstructed
//! parameter shapes. With no arguments it writes two synthetic chain files to
//! the system temp directory first and reads those back.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use stan_extract::reader::read_multi_chain;

/// Builds one synthetic chain file: preamble, header, warm-up phase,
/// adaptation sentinel, then the kept draws.
fn write_demo_chain(path: &PathBuf, offset: f64) -> Result<(), Box<dyn Error>> {
    const NUM_SAMPLES: usize = 50;
    const NUM_WARMUP: usize = 10;

    let mut contents = String::new();
    contents.push_str("# model = demo_model\n");
    contents.push_str(&format!("# num_samples = {} (Default)\n", NUM_SAMPLES));
    contents.push_str(&format!("# num_warmup = {} (Default)\n", NUM_WARMUP));
    contents.push_str("lp__,mu,sigma.1,sigma.2\n");
    for i in 0..NUM_WARMUP {
        contents.push_str(&format!("{:.2},0.0,1.0,1.0\n", offset - i as f64));
    }
    contents.push_str("# Adaptation terminated\n");
    for i in 0..NUM_SAMPLES {
        let t = i as f64 / NUM_SAMPLES as f64;
        contents.push_str(&format!(
            "{:.4},{:.4},{:.4},{:.4}\n",
            offset - t,
            offset + t,
            1.0 + t,
            2.0 + t
        ));
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Main entry point: resolves the chain files, runs the multi-chain reader,
/// and prints what came back.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let paths: Vec<PathBuf> = if args.is_empty() {
        let dir = std::env::temp_dir();
        let paths = vec![dir.join("demo_chain_1.csv"), dir.join("demo_chain_2.csv")];
        for (i, path) in paths.iter().enumerate() {
            write_demo_chain(path, -10.0 * (i + 1) as f64)?;
        }
        println!("Wrote demo chains to {}", dir.display());
        paths
    } else {
        args.into_iter().map(PathBuf::from).collect()
    };

    let (extract, attributes) = read_multi_chain::<f64, _>(&paths, false)?;

    println!(
        "Read {} chains: num_samples={}, num_warmup={}",
        paths.len(),
        attributes.get("num_samples").map_or("?", String::as_str),
        attributes.get("num_warmup").map_or("?", String::as_str),
    );
    for (name, param) in &extract {
        println!("{:<12} shape {:?}", name, param.shape());
    }

    if let Some(lp) = extract.get("lp__").and_then(|p| p.as_scalar()) {
        let mean = lp.sum() / lp.len() as f64;
        println!("mean lp__: {:.4}", mean);
    }

    Ok(())
}

#[test]
fn test_main() {
    main().expect("Expected main to not return an error.");
}
