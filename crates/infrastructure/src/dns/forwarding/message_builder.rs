//! Upstream query encoding via `hickory-proto`.

use dns_relay_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType as HickoryRecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

pub struct MessageBuilder;

impl MessageBuilder {
    /// One-question IN query with RD set and a random id, returned with
    /// its encoding so the caller can match the reply.
    pub fn build_query_with_id(
        domain: &str,
        record_type: RecordType,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let name = Name::from_str(domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(HickoryRecordType::from(record_type.to_u16()));
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.metadata.recursion_desired = true;
        message.add_query(query);

        let mut wire = Vec::with_capacity(64);
        message
            .emit(&mut BinEncoder::new(&mut wire))
            .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", domain, e)))?;

        Ok((id, wire))
    }
}
