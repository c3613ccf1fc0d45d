//! Runs the randomized membership check against an `AaTree<String>`.
//!
//! Exit status: 0 on success, 1 if the tree cannot be created, 2 on a lookup
//! mismatch, 3 on an unexpected insert/remove failure, 4 if resizing fails.

use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use aatree::error::ConformanceError;
use aatree::harness::{Conformance, Container};
use aatree::{AaTree, Natural};
use clap::Parser;
use log::error;

#[derive(Parser, Debug)]
#[command(version, about = "Randomized conformance run for the Andersson tree")]
struct Args {
	/// Seed for the index generator; defaults to the current time.
	seed: Option<u64>,

	/// Number of distinct numeric-string elements.
	#[arg(long, default_value_t = 2048)]
	members: usize,

	/// Number of lookup-and-toggle steps; defaults to twice `members`.
	#[arg(long)]
	steps: Option<usize>,
}

fn main() {
	pretty_env_logger::init();
	let args = Args::parse();

	let seed = args.seed.unwrap_or_else(|| {
		SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
	});
	let config = Conformance {
		members: args.members,
		steps: args.steps.unwrap_or(2 * args.members),
		resize_at: args.members,
		seed,
	};

	let mut tree: AaTree<String> = match AaTree::try_with_policy(Natural) {
		Ok(tree) => tree,
		Err(err) => {
			error!("{err}");
			fail(ConformanceError::Allocation {
				name: "test-atree",
			});
		}
	};

	let name = tree.name();
	println!("{name}: seed = {seed}");

	match config.run(&mut tree) {
		Ok(_) => println!("{name}: \x1b[32mPASS\x1b[0m"),
		Err(err) => fail(err),
	}
}

fn fail(err: ConformanceError) -> ! {
	eprintln!("{err}");
	process::exit(err.exit_code());
}
