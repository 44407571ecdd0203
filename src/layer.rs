use pnet::packet::Packet;
use pnet::packet::ethernet::EtherTypes;
use pnet::packet::ethernet::MutableEthernetPacket;
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4;
use pnet::packet::ipv4::MutableIpv4Packet;
use pnet::packet::tcp;
use pnet::packet::tcp::MutableTcpPacket;
use pnet::packet::tcp::TcpFlags;
use std::panic::Location;
use tracing::debug;

use crate::config::FlowSpec;
use crate::error::SeqcapError;

pub const ETHERNET_HEADER_SIZE: usize = 14;
pub const IPV4_HEADER_SIZE: usize = 20;
pub const TCP_HEADER_SIZE: usize = 20;
// the snaplen written into the capture header, a frame must fit in it
pub const SNAPLEN: usize = 65535;
pub const MAX_PAYLOAD_SIZE: usize =
    SNAPLEN - ETHERNET_HEADER_SIZE - IPV4_HEADER_SIZE - TCP_HEADER_SIZE;

/// Every generated segment carries PSH and ACK, with the ack number left at 0.
pub const TCP_FLAGS: u8 = TcpFlags::PSH | TcpFlags::ACK;
pub const TCP_ACK_NUM: u32 = 0;

/// One complete Ethernet frame holding an IPv4/TCP segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpFrame {
    seq: u32,
    data: Vec<u8>,
}

impl TcpFrame {
    /// The tcp sequence number written into this frame.
    pub fn sequence(&self) -> u32 {
        self.seq
    }
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Assemble ethernet, ipv4 and tcp headers plus `payload` into one frame.
/// Both the ipv4 header checksum and the tcp checksum are filled in.
pub fn build_tcp_frame(flow: &FlowSpec, seq: u32, payload: &[u8]) -> Result<TcpFrame, SeqcapError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(SeqcapError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }
    let ip_total_length = IPV4_HEADER_SIZE + TCP_HEADER_SIZE + payload.len();
    let mut buff = vec![0u8; ETHERNET_HEADER_SIZE + ip_total_length];

    // ethernet header
    {
        let mut ethernet_header = match MutableEthernetPacket::new(&mut buff) {
            Some(p) => p,
            None => {
                return Err(SeqcapError::BuildPacketError {
                    location: format!("{}", Location::caller()),
                });
            }
        };
        ethernet_header.set_destination(flow.dst_mac);
        ethernet_header.set_source(flow.src_mac);
        ethernet_header.set_ethertype(EtherTypes::Ipv4);
    }

    // ip header
    {
        let mut ip_header = match MutableIpv4Packet::new(&mut buff[ETHERNET_HEADER_SIZE..]) {
            Some(p) => p,
            None => {
                return Err(SeqcapError::BuildPacketError {
                    location: format!("{}", Location::caller()),
                });
            }
        };
        ip_header.set_version(4);
        ip_header.set_header_length(5);
        ip_header.set_total_length(ip_total_length as u16);
        ip_header.set_identification(flow.ip_id);
        ip_header.set_flags(0);
        ip_header.set_ttl(flow.ttl);
        ip_header.set_next_level_protocol(IpNextHeaderProtocols::Tcp);
        ip_header.set_source(flow.src_ipv4);
        ip_header.set_destination(flow.dst_ipv4);
        let c = ipv4::checksum(&ip_header.to_immutable());
        ip_header.set_checksum(c);
    }

    // tcp header
    {
        let tcp_start = ETHERNET_HEADER_SIZE + IPV4_HEADER_SIZE;
        let mut tcp_header = match MutableTcpPacket::new(&mut buff[tcp_start..]) {
            Some(p) => p,
            None => {
                return Err(SeqcapError::BuildPacketError {
                    location: format!("{}", Location::caller()),
                });
            }
        };
        tcp_header.set_source(flow.src_port);
        tcp_header.set_destination(flow.dst_port);
        tcp_header.set_sequence(seq);
        tcp_header.set_acknowledgement(TCP_ACK_NUM);
        tcp_header.set_reserved(0);
        tcp_header.set_flags(TCP_FLAGS);
        tcp_header.set_window(flow.window);
        tcp_header.set_urgent_ptr(0);
        tcp_header.set_data_offset(5);
        tcp_header.set_payload(payload);
        let checksum = tcp::ipv4_checksum(&tcp_header.to_immutable(), &flow.src_ipv4, &flow.dst_ipv4);
        tcp_header.set_checksum(checksum);
        debug!(
            "tcp segment seq {} len {}: {}",
            seq,
            tcp_header.packet().len(),
            hex::encode(tcp_header.packet())
        );
    }

    Ok(TcpFrame { seq, data: buff })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use pnet::datalink::MacAddr;
    use pnet::packet::ethernet::EthernetPacket;
    use pnet::packet::ipv4::Ipv4Packet;
    use pnet::packet::tcp::TcpPacket;
    use std::net::Ipv4Addr;
    #[test]
    fn test_build_tcp_frame() {
        let flow = GeneratorConfig::default().validate().unwrap();
        let frame = build_tcp_frame(&flow, 1000, b"HelloTCP").unwrap();
        assert_eq!(frame.sequence(), 1000);
        assert_eq!(frame.len(), ETHERNET_HEADER_SIZE + IPV4_HEADER_SIZE + TCP_HEADER_SIZE + 8);

        let ethernet_packet = EthernetPacket::new(frame.as_bytes()).unwrap();
        assert_eq!(ethernet_packet.get_ethertype(), EtherTypes::Ipv4);
        assert_eq!(ethernet_packet.get_source(), MacAddr::zero());
        assert_eq!(ethernet_packet.get_destination(), MacAddr::broadcast());

        let ipv4_packet = Ipv4Packet::new(ethernet_packet.payload()).unwrap();
        assert_eq!(ipv4_packet.get_version(), 4);
        assert_eq!(ipv4_packet.get_total_length(), 48);
        assert_eq!(ipv4_packet.get_ttl(), 64);
        assert_eq!(ipv4_packet.get_identification(), 1);
        assert_eq!(ipv4_packet.get_next_level_protocol(), IpNextHeaderProtocols::Tcp);
        assert_eq!(ipv4_packet.get_source(), Ipv4Addr::new(192, 168, 0, 1));
        assert_eq!(ipv4_packet.get_destination(), Ipv4Addr::new(192, 168, 0, 2));

        let tcp_packet = TcpPacket::new(ipv4_packet.payload()).unwrap();
        assert_eq!(tcp_packet.get_source(), 12345);
        assert_eq!(tcp_packet.get_destination(), 80);
        assert_eq!(tcp_packet.get_sequence(), 1000);
        assert_eq!(tcp_packet.get_acknowledgement(), 0);
        assert_eq!(tcp_packet.get_flags(), TcpFlags::PSH | TcpFlags::ACK);
        assert_eq!(tcp_packet.get_window(), 8192);
        assert_eq!(tcp_packet.get_data_offset(), 5);
        assert_eq!(tcp_packet.payload(), b"HelloTCP");
    }
    #[test]
    fn test_checksums_verify() {
        let flow = GeneratorConfig::default().validate().unwrap();
        let frame = build_tcp_frame(&flow, 0xdead_beef, b"checksum me").unwrap();
        let ethernet_packet = EthernetPacket::new(frame.as_bytes()).unwrap();
        let ipv4_packet = Ipv4Packet::new(ethernet_packet.payload()).unwrap();
        assert_eq!(ipv4_packet.get_checksum(), ipv4::checksum(&ipv4_packet));
        let tcp_packet = TcpPacket::new(ipv4_packet.payload()).unwrap();
        let expected = tcp::ipv4_checksum(&tcp_packet, &flow.src_ipv4, &flow.dst_ipv4);
        assert_eq!(tcp_packet.get_checksum(), expected);
    }
    #[test]
    fn test_empty_payload() {
        let flow = GeneratorConfig::default().validate().unwrap();
        let frame = build_tcp_frame(&flow, 7, b"").unwrap();
        assert_eq!(frame.len(), ETHERNET_HEADER_SIZE + IPV4_HEADER_SIZE + TCP_HEADER_SIZE);
        let ethernet_packet = EthernetPacket::new(frame.as_bytes()).unwrap();
        let ipv4_packet = Ipv4Packet::new(ethernet_packet.payload()).unwrap();
        let tcp_packet = TcpPacket::new(ipv4_packet.payload()).unwrap();
        assert!(tcp_packet.payload().is_empty());
        assert_eq!(tcp_packet.get_sequence(), 7);
    }
    #[test]
    fn test_oversize_payload() {
        let flow = GeneratorConfig::default().validate().unwrap();
        let payload = vec![0u8; MAX_PAYLOAD_SIZE + 1];
        let ret = build_tcp_frame(&flow, 0, &payload);
        assert!(matches!(ret, Err(SeqcapError::PayloadTooLarge { .. })));
        let payload = vec![0u8; MAX_PAYLOAD_SIZE];
        let frame = build_tcp_frame(&flow, 0, &payload).unwrap();
        assert_eq!(frame.len(), SNAPLEN);
    }
}
