use pcap_file::DataLink;
use pcap_file::Endianness;
use pcap_file::TsResolution;
use pcap_file::pcap::PcapHeader;
use pcap_file::pcap::PcapPacket;
use pcap_file::pcap::PcapReader;
use pcap_file::pcap::PcapWriter;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use tracing::info;

use crate::error::SeqcapError;
use crate::generator::PacketBatch;
use crate::layer::SNAPLEN;

/// Classic pcap v2.4, little-endian, microsecond timestamps, ethernet link type.
/// Pinned rather than taking the host endianness so output is the same on every machine.
pub fn pcap_header() -> PcapHeader {
    PcapHeader {
        version_major: 2,
        version_minor: 4,
        ts_correction: 0,
        ts_accuracy: 0,
        snaplen: SNAPLEN as u32,
        datalink: DataLink::ETHERNET,
        ts_resolution: TsResolution::MicroSecond,
        endianness: Endianness::Little,
    }
}

/// Serialize every frame of `batch`, in order, into `writer`.
/// All records carry a zero timestamp. The writer is handed back unflushed.
pub fn write_pcap_to<W: Write>(writer: W, batch: &PacketBatch) -> Result<W, SeqcapError> {
    let mut pcap_writer = PcapWriter::with_header(writer, pcap_header())?;
    for frame in &batch.frames {
        let packet = PcapPacket::new(Duration::ZERO, frame.len() as u32, frame.as_bytes());
        pcap_writer.write_packet(&packet)?;
    }
    Ok(pcap_writer.into_writer())
}

/// Write `batch` to `path`, truncating any existing file.
pub fn write_pcap<P: AsRef<Path>>(path: P, batch: &PacketBatch) -> Result<(), SeqcapError> {
    let path = path.as_ref();
    debug!("create capture file {}", path.display());
    let fp = File::create(path)?;
    let mut writer = write_pcap_to(BufWriter::new(fp), batch)?;
    writer.flush()?;
    info!("{} records saved into {}", batch.len(), path.display());
    Ok(())
}

pub fn read_pcap_from<R: Read>(reader: R) -> Result<Vec<Vec<u8>>, SeqcapError> {
    let mut pcap_reader = PcapReader::new(reader)?;
    let mut frames = Vec::new();
    while let Some(packet) = pcap_reader.next_packet() {
        let packet = packet?;
        frames.push(packet.data.into_owned());
    }
    Ok(frames)
}

/// Read the raw frames of a capture file back, in record order.
pub fn read_pcap<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<u8>>, SeqcapError> {
    let fp = File::open(path.as_ref())?;
    read_pcap_from(BufReader::new(fp))
}
