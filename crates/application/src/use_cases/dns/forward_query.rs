use crate::ports::DnsResolver;
use dns_relay_domain::dns_message::label_sequence_to_dotted_string;
use dns_relay_domain::{
    DnsHeader, DnsQuestion, DnsReply, DomainError, ForwarderSettings, ResourceRecord, HEADER_SIZE,
};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Progress of one datagram through the forwarder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardStage {
    Received,
    HeaderDecoded,
    QuestionDecoded,
    NameResolved,
    ReplyEncoded,
}

impl ForwardStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForwardStage::Received => "received",
            ForwardStage::HeaderDecoded => "header_decoded",
            ForwardStage::QuestionDecoded => "question_decoded",
            ForwardStage::NameResolved => "name_resolved",
            ForwardStage::ReplyEncoded => "reply_encoded",
        }
    }
}

impl fmt::Display for ForwardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Turns one raw query datagram into one raw reply datagram.
///
/// Any failure drops only this datagram; the caller decides how to log it
/// and never sends anything back.
pub struct ForwardQueryUseCase {
    resolver: Arc<dyn DnsResolver>,
    settings: ForwarderSettings,
}

impl ForwardQueryUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>, settings: ForwarderSettings) -> Self {
        Self { resolver, settings }
    }

    pub async fn execute(&self, datagram: &[u8]) -> Result<Vec<u8>, DomainError> {
        let header = DnsHeader::deserialize(datagram)
            .map_err(|e| stage_failed(ForwardStage::Received, e))?;

        let (question, consumed) = DnsQuestion::deserialize(&datagram[HEADER_SIZE..])
            .map_err(|e| stage_failed(ForwardStage::HeaderDecoded, e))?;

        debug!(
            id = header.id,
            question_bytes = consumed,
            trailing_bytes = datagram.len() - HEADER_SIZE - consumed,
            qtype = %question.record_type(),
            "Question decoded"
        );

        let domain = question.domain().map_err(|e| {
            debug!(
                partial_name = %label_sequence_to_dotted_string(&question.qname),
                "Rejecting malformed QNAME"
            );
            stage_failed(ForwardStage::QuestionDecoded, e)
        })?;

        let addresses = self
            .resolve(&domain)
            .await
            .map_err(|e| stage_failed(ForwardStage::QuestionDecoded, e))?;

        let answer = ResourceRecord::build_answer(
            question.qname.clone(),
            question.qtype,
            question.qclass,
            self.settings.answer_ttl,
            &addresses,
        )
        .map_err(|e| stage_failed(ForwardStage::NameResolved, e))?;

        let reply = DnsReply::new(&header, question, answer)
            .serialize()
            .map_err(|e| stage_failed(ForwardStage::NameResolved, e))?;

        debug!(
            id = header.id,
            domain = %domain,
            address = %addresses[0],
            reply_bytes = reply.len(),
            stage = %ForwardStage::ReplyEncoded,
            "Reply encoded"
        );

        Ok(reply)
    }

    /// Calls the resolver under the configured timeout. Errors, empty
    /// results and timeouts all collapse into `NoAddressAvailable`.
    async fn resolve(&self, domain: &str) -> Result<Vec<IpAddr>, DomainError> {
        match tokio::time::timeout(self.settings.timeout, self.resolver.resolve(domain)).await {
            Ok(Ok(addresses)) if addresses.is_empty() => Err(DomainError::NoAddressAvailable(
                format!("no addresses for {}", domain),
            )),
            Ok(Ok(addresses)) => Ok(addresses),
            Ok(Err(e)) => Err(DomainError::NoAddressAvailable(format!(
                "resolving {} failed: {}",
                domain, e
            ))),
            Err(_) => Err(DomainError::NoAddressAvailable(format!(
                "resolving {} timed out after {}ms",
                domain,
                self.settings.timeout.as_millis()
            ))),
        }
    }
}

fn stage_failed(stage: ForwardStage, error: DomainError) -> DomainError {
    debug!(stage = %stage, error = %error, "Dropping datagram");
    error
}
