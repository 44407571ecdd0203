use tracing::debug;
use tracing::info;

use crate::config::FlowSpec;
use crate::config::GeneratorConfig;
use crate::error::SeqcapError;
use crate::layer::TcpFrame;
use crate::layer::build_tcp_frame;

/// The ordered frames of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketBatch {
    pub flow: FlowSpec,
    pub frames: Vec<TcpFrame>,
    /// Sequence number the next frame would have carried.
    pub next_seq: u32,
}

impl PacketBatch {
    /// Build `num_packets` frames. Frame `i` carries
    /// `initial_seq + i * payload.len()` (mod 2^32) as its sequence number.
    pub fn generate(config: &GeneratorConfig) -> Result<PacketBatch, SeqcapError> {
        let flow = config.validate()?;
        let step = config.payload.len() as u32;
        let mut seq = config.initial_seq;
        let mut frames = Vec::with_capacity(config.num_packets);

        for i in 0..config.num_packets {
            let frame = build_tcp_frame(&flow, seq, &config.payload)?;
            debug!("frame {} built with seq {}", i, seq);
            frames.push(frame);
            seq = seq.wrapping_add(step);
        }

        info!(
            "generated {} tcp frames {}:{} -> {}:{}",
            frames.len(),
            flow.src_ipv4,
            flow.src_port,
            flow.dst_ipv4,
            flow.dst_port
        );
        Ok(PacketBatch {
            flow,
            frames,
            next_seq: seq,
        })
    }
    pub fn len(&self) -> usize {
        self.frames.len()
    }
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
    pub fn sequence_numbers(&self) -> Vec<u32> {
        self.frames.iter().map(|f| f.sequence()).collect()
    }
}
