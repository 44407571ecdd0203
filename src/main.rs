use seqcap::GeneratorConfig;
use seqcap::SeqcapError;
use seqcap::SeqcapLogger;
use seqcap::generate_and_write;

/// Writes the default fixture, ten PSH+ACK segments carrying `HelloTCP`, to `input.pcap`.
fn main() -> Result<(), SeqcapError> {
    SeqcapLogger::Warn.init()?;
    let config = GeneratorConfig::default();
    let summary = generate_and_write(&config)?;
    println!("{}", summary);
    Ok(())
}
