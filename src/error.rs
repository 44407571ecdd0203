use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeqcapError {
    /* CONFIG ERROR */
    #[error("invalid ipv4 address for {field}: [{value}]")]
    InvalidAddress { field: String, value: String },
    #[error("payload length {len} is too large, the max payload length is {max}")]
    PayloadTooLarge { len: usize, max: usize },
    #[error("serde json error")]
    SerdeJsonError(#[from] serde_json::Error),

    /* LAYER ERROR */
    #[error("build packet error occurret at [{location}]")]
    BuildPacketError { location: String },

    /* CAPTURE ERROR */
    #[error("pcap file error")]
    PcapError(#[from] pcap_file::PcapError),

    /* OTHER ERROR */
    #[error("std error")]
    IOError(#[from] std::io::Error),
    #[error("init the logger error: {e}")]
    InitLoggerError { e: String },
}
