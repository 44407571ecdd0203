//! Generate synthetic TCP/IPv4 packet captures for use as test fixtures.
//!
//! Each run builds a fixed number of Ethernet/IPv4/TCP frames between one pair
//! of endpoints. Every frame carries the same payload with PSH+ACK set, and the
//! tcp sequence number advances by the payload length from one frame to the next.
//! The whole batch is then written to a classic pcap file in one go.
//!
//! ```rust,no_run
//! use seqcap::GeneratorConfig;
//! use seqcap::generate_and_write;
//!
//! fn main() -> Result<(), seqcap::SeqcapError> {
//!     let config = GeneratorConfig {
//!         num_packets: 4,
//!         payload: b"fixture".to_vec(),
//!         ..Default::default()
//!     };
//!     let summary = generate_and_write(&config)?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```
use std::fmt;
use std::path::PathBuf;
use tracing::Level;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

pub mod capture;
pub mod config;
pub mod error;
pub mod generator;
pub mod layer;

pub use config::FlowSpec;
pub use config::GeneratorConfig;
pub use error::SeqcapError;
pub use generator::PacketBatch;
pub use layer::TcpFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqcapLogger {
    Debug,
    Info,
    Warn,
    None,
}

impl SeqcapLogger {
    /// Install a global fmt subscriber on stderr, stdout is left for the program output.
    pub fn init(self) -> Result<(), SeqcapError> {
        let level = match self {
            SeqcapLogger::Debug => Level::DEBUG,
            SeqcapLogger::Info => Level::INFO,
            SeqcapLogger::Warn => Level::WARN,
            SeqcapLogger::None => return Ok(()),
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        match tracing::subscriber::set_global_default(subscriber) {
            Ok(_) => Ok(()),
            Err(e) => Err(SeqcapError::InitLoggerError { e: e.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub num_packets: usize,
    pub output: PathBuf,
    pub first_seq: u32,
    pub next_seq: u32,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} TCP packets written to {}",
            self.num_packets,
            self.output.display()
        )
    }
}

/// Build the whole batch described by `config` and write it to `config.output`.
/// Frames are all built before the file is touched, so a bad address or payload
/// fails without creating or truncating the output file.
pub fn generate_and_write(config: &GeneratorConfig) -> Result<BatchSummary, SeqcapError> {
    let batch = PacketBatch::generate(config)?;
    capture::write_pcap(&config.output, &batch)?;
    info!(
        "batch done, seq {} -> {}",
        config.initial_seq, batch.next_seq
    );
    Ok(BatchSummary {
        num_packets: batch.len(),
        output: config.output.clone(),
        first_seq: config.initial_seq,
        next_seq: batch.next_seq,
    })
}
