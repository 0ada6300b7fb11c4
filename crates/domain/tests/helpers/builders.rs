#![allow(dead_code)]
use dns_relay_domain::dns_message::encode_dotted_name;
use dns_relay_domain::{DnsHeader, DnsQuestion, CLASS_IN};

pub struct QueryBuilder {
    header: DnsHeader,
    domain: String,
    qtype: u16,
    qclass: u16,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            header: DnsHeader {
                id: 0x1234,
                flags: 0x0100,
                question_count: 1,
                ..DnsHeader::default()
            },
            domain: "example.com".to_string(),
            qtype: 1,
            qclass: CLASS_IN,
        }
    }

    pub fn id(mut self, id: u16) -> Self {
        self.header.id = id;
        self
    }

    pub fn flags(mut self, flags: u16) -> Self {
        self.header.flags = flags;
        self
    }

    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }

    pub fn qtype(mut self, qtype: u16) -> Self {
        self.qtype = qtype;
        self
    }

    pub fn question(&self) -> DnsQuestion {
        DnsQuestion::new(
            encode_dotted_name(&self.domain).unwrap(),
            self.qtype,
            self.qclass,
        )
    }

    pub fn build(self) -> Vec<u8> {
        let mut buf = self.header.serialize().to_vec();
        buf.extend_from_slice(&self.question().serialize());
        buf
    }
}
