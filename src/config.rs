use pnet::datalink::MacAddr;
use serde::Deserialize;
use serde::Serialize;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::path::PathBuf;
use tracing::debug;

use crate::error::SeqcapError;
use crate::layer::MAX_PAYLOAD_SIZE;

pub const DEFAULT_OUTPUT: &str = "input.pcap";
pub const DEFAULT_SRC_ADDR: &str = "192.168.0.1";
pub const DEFAULT_DST_ADDR: &str = "192.168.0.2";
pub const DEFAULT_SRC_PORT: u16 = 12345;
pub const DEFAULT_DST_PORT: u16 = 80;
pub const DEFAULT_NUM_PACKETS: usize = 10;
pub const DEFAULT_PAYLOAD: &[u8] = b"HelloTCP";
pub const DEFAULT_INITIAL_SEQ: u32 = 1000;
pub const DEFAULT_TTL: u8 = 64;
pub const DEFAULT_IP_ID: u16 = 1;
pub const DEFAULT_WINDOW: u16 = 8192;

/// Everything needed to produce one capture file.
/// Addresses are kept as strings and only parsed by [`GeneratorConfig::validate`],
/// so a config loaded from disk can carry a bad address until generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub output: PathBuf,
    pub src_addr: String,
    pub dst_addr: String,
    pub src_port: u16,
    pub dst_port: u16,
    pub num_packets: usize,
    pub payload: Vec<u8>,
    pub initial_seq: u32,
    pub src_mac: MacAddr,
    pub dst_mac: MacAddr,
    pub ttl: u8,
    pub ip_id: u16,
    pub window: u16,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output: PathBuf::from(DEFAULT_OUTPUT),
            src_addr: String::from(DEFAULT_SRC_ADDR),
            dst_addr: String::from(DEFAULT_DST_ADDR),
            src_port: DEFAULT_SRC_PORT,
            dst_port: DEFAULT_DST_PORT,
            num_packets: DEFAULT_NUM_PACKETS,
            payload: DEFAULT_PAYLOAD.to_vec(),
            initial_seq: DEFAULT_INITIAL_SEQ,
            src_mac: MacAddr::zero(),
            dst_mac: MacAddr::broadcast(),
            ttl: DEFAULT_TTL,
            ip_id: DEFAULT_IP_ID,
            window: DEFAULT_WINDOW,
        }
    }
}

/// The header fields shared by every frame of a batch, already parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSpec {
    pub src_mac: MacAddr,
    pub dst_mac: MacAddr,
    pub src_ipv4: Ipv4Addr,
    pub dst_ipv4: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub ttl: u8,
    pub ip_id: u16,
    pub window: u16,
}

fn parse_ipv4(field: &str, value: &str) -> Result<Ipv4Addr, SeqcapError> {
    match value.parse::<Ipv4Addr>() {
        Ok(addr) => Ok(addr),
        Err(_) => Err(SeqcapError::InvalidAddress {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

impl GeneratorConfig {
    pub fn from_json_str(s: &str) -> Result<GeneratorConfig, SeqcapError> {
        let config: GeneratorConfig = serde_json::from_str(s)?;
        Ok(config)
    }
    /// Missing fields fall back to the compiled-in defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<GeneratorConfig, SeqcapError> {
        let path = path.as_ref();
        debug!("load generator config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
    pub fn validate(&self) -> Result<FlowSpec, SeqcapError> {
        let src_ipv4 = parse_ipv4("src_addr", &self.src_addr)?;
        let dst_ipv4 = parse_ipv4("dst_addr", &self.dst_addr)?;
        if self.payload.len() > MAX_PAYLOAD_SIZE {
            return Err(SeqcapError::PayloadTooLarge {
                len: self.payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(FlowSpec {
            src_mac: self.src_mac,
            dst_mac: self.dst_mac,
            src_ipv4,
            dst_ipv4,
            src_port: self.src_port,
            dst_port: self.dst_port,
            ttl: self.ttl,
            ip_id: self.ip_id,
            window: self.window,
        })
    }
}
