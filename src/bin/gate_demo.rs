// Gate demo - drives a Gate with a handful of reader/writer workers
// and a probe thread, printing periodic counter snapshots.

use std::sync::Arc;
use std::time::Duration;

use gatekeeper::gate::Policy;
use gatekeeper::resource::{CharDataGenerator, DataGenerator, ResourceBuffer};
use gatekeeper::workers::{Reader, Writer};
use gatekeeper::{Gate, VERSION};
use tracing::info;

/// Demo-only configuration; the Gate itself takes no configuration
/// beyond its `Policy` (see SPEC_FULL.md §6).
#[derive(Debug, Clone)]
struct Config {
    policy: Policy,
    readers: usize,
    writers: usize,
    reader_cap: Option<u32>,
    run_for: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy: Policy::Reader,
            readers: 4,
            writers: 2,
            reader_cap: None,
            run_for: Duration::from_secs(5),
        }
    }
}

impl Config {
    fn from_args() -> Self {
        let mut config = Self::default();
        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--policy" => {
                    if let Some(v) = args.next() {
                        config.policy = parse_policy(&v);
                    }
                }
                "--readers" => {
                    if let Some(v) = args.next() {
                        config.readers = v.parse().unwrap_or(config.readers);
                    }
                }
                "--writers" => {
                    if let Some(v) = args.next() {
                        config.writers = v.parse().unwrap_or(config.writers);
                    }
                }
                "--reader-cap" => {
                    if let Some(v) = args.next() {
                        config.reader_cap = v.parse().ok();
                    }
                }
                "--seconds" => {
                    if let Some(v) = args.next() {
                        if let Ok(secs) = v.parse() {
                            config.run_for = Duration::from_secs(secs);
                        }
                    }
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => {}
            }
        }
        config
    }
}

fn parse_policy(s: &str) -> Policy {
    match s.to_ascii_lowercase().as_str() {
        "xclusive" => Policy::Xclusive,
        "roundrobin" => Policy::RoundRobin,
        "writer" => Policy::Writer,
        "none" => Policy::None,
        _ => Policy::Reader,
    }
}

fn print_usage() {
    println!(
        "gate-demo [--policy xclusive|roundrobin|reader|writer|none] \
         [--readers N] [--writers N] [--reader-cap N] [--seconds N]"
    );
}

fn print_banner(config: &Config) {
    println!("==============================================");
    println!(" Gatekeeper demo - v{}", VERSION);
    println!("==============================================");
    println!("policy:      {:?}", config.policy);
    println!("readers:     {}", config.readers);
    println!("writers:     {}", config.writers);
    println!("reader cap:  {:?}", config.reader_cap);
    println!("run for:     {:?}", config.run_for);
    println!("==============================================");
}

fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    let config = Config::from_args();
    print_banner(&config);

    if let Some(cap) = config.reader_cap {
        Gate::set_reader_cap(Some(cap));
    }

    let gate = Arc::new(Gate::new(config.policy));
    let resource = Arc::new(ResourceBuffer::default());
    let generator: Arc<dyn DataGenerator> = Arc::new(CharDataGenerator::new(b'x', 32));

    info!("spawning {} readers and {} writers", config.readers, config.writers);

    let mut readers: Vec<Reader> = (0..config.readers)
        .map(|_| Reader::new(gate.clone(), resource.clone(), Duration::from_millis(20)))
        .collect();
    let mut writers: Vec<Writer> = (0..config.writers)
        .map(|_| {
            Writer::new(
                gate.clone(),
                resource.clone(),
                generator.clone(),
                Duration::from_millis(20),
            )
        })
        .collect();

    let elapsed_step = Duration::from_millis(500);
    let mut elapsed = Duration::ZERO;
    while elapsed < config.run_for {
        std::thread::sleep(elapsed_step);
        elapsed += elapsed_step;
        info!(
            readers = gate.number_of_readers(),
            writers = gate.number_of_writers(),
            future_readers = gate.number_of_future_readers(),
            resource_size = resource.size(),
            "snapshot"
        );
    }

    for r in &mut readers {
        r.stop();
    }
    for w in &mut writers {
        w.stop();
    }

    println!("final resource size: {}", resource.size());
}
