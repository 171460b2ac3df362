//! Per-transaction inspection reports.
//!
//! An [`Inspector`] decodes a raw transaction, classifies every script with
//! the pattern matcher, decodes the Tokenized action carried by each
//! recognized envelope, and follows transactions and action scripts embedded
//! in messages. Problems with one output are recorded on that output's
//! report; only an undecodable transaction fails the whole inspection.

use serde::Serialize;

use txscope_envelope::{decode_input_script, decode_output_script, Payload};
use txscope_primitives::chainhash::ChainHash;
use txscope_primitives::util::ByteRange;
use txscope_script::{AddressEncoder, Base58AddressEncoder, Network, Script};
use txscope_tokenized::{
    DecodeContext, DecodeLimits, DecodedValue, PayloadDecoder, SchemaKind, SchemaSet,
};
use txscope_transaction::{Transaction, TransactionInput, TransactionOutput};

use crate::config::InspectConfig;
use crate::fee::FeeSummary;
use crate::InspectError;

static MAINNET_ADDRESSES: Base58AddressEncoder = Base58AddressEncoder {
    network: Network::Mainnet,
};
static TESTNET_ADDRESSES: Base58AddressEncoder = Base58AddressEncoder {
    network: Network::Testnet,
};

fn network_encoder(network: Network) -> &'static dyn AddressEncoder {
    match network {
        Network::Mainnet => &MAINNET_ADDRESSES,
        Network::Testnet => &TESTNET_ADDRESSES,
    }
}

fn range_hex(raw: &[u8], range: ByteRange) -> String {
    range.slice(raw).map(hex::encode).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Everything recognized in one transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionReport {
    pub txid: ChainHash,
    pub size: usize,
    pub transaction: Transaction,
    pub inputs: Vec<InputReport>,
    pub outputs: Vec<OutputReport>,
}

impl TransactionReport {
    /// Fee summary given the output each input spends.
    pub fn fee(&self, spent_outputs: &[Option<TransactionOutput>]) -> FeeSummary {
        FeeSummary::new(&self.transaction, spent_outputs)
    }

    /// Tokenized actions found in this transaction's outputs, in output order.
    pub fn actions(&self) -> impl Iterator<Item = &DecodedValue> {
        self.outputs.iter().filter_map(|o| o.content.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputReport {
    pub index: usize,
    pub byte_range: ByteRange,
    /// The input's bytes in the source buffer, hex encoded.
    pub raw_hex: String,
    pub payload: Option<Payload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputReport {
    pub index: usize,
    pub satoshis: u64,
    pub byte_range: ByteRange,
    /// The output's bytes in the source buffer, hex encoded.
    pub raw_hex: String,
    pub payload: Option<Payload>,
    /// The action an envelope payload decoded to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<DecodedValue>,
    /// What the action's message carries, if anything.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
    /// Why classification of this output stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Data nested inside a Tokenized message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Embedded {
    /// The transaction an `Offer` or `SignatureRequest` carries.
    Transaction(Box<TransactionReport>),
    /// The settlement action script a `SettlementRequest` carries.
    ActionScript {
        payload: Option<Payload>,
        content: Option<DecodedValue>,
    },
}

// ---------------------------------------------------------------------------
// Inspector
// ---------------------------------------------------------------------------

/// Builds [`TransactionReport`]s against one schema set.
///
/// Copying an inspector is cheap; nested inspections run on a copy one
/// level deeper, so the decode context's depth bound covers embedded
/// transactions as well as nested payloads.
#[derive(Clone, Copy)]
pub struct Inspector<'a> {
    ctx: DecodeContext<'a>,
    encoder: &'a dyn AddressEncoder,
}

impl<'a> Inspector<'a> {
    /// An inspector with mainnet addresses and default limits.
    pub fn new(schemas: &'a SchemaSet) -> Self {
        Inspector {
            ctx: DecodeContext::new(schemas),
            encoder: &MAINNET_ADDRESSES,
        }
    }

    pub fn from_config(schemas: &'a SchemaSet, config: &InspectConfig) -> Self {
        Inspector {
            ctx: DecodeContext::new(schemas).with_limits(config.limits),
            encoder: network_encoder(config.network),
        }
    }

    pub fn with_encoder(self, encoder: &'a dyn AddressEncoder) -> Self {
        Inspector { encoder, ..self }
    }

    pub fn with_limits(self, limits: DecodeLimits) -> Self {
        Inspector {
            ctx: self.ctx.with_limits(limits),
            ..self
        }
    }

    pub fn with_decoder(self, decoder: &'a dyn PayloadDecoder) -> Self {
        Inspector {
            ctx: self.ctx.with_decoder(decoder),
            ..self
        }
    }

    pub fn context(&self) -> &DecodeContext<'a> {
        &self.ctx
    }

    fn nested(&self) -> Result<Inspector<'a>, InspectError> {
        Ok(Inspector {
            ctx: self.ctx.nested()?,
            ..*self
        })
    }

    /// Decode and classify one raw transaction.
    ///
    /// # Returns
    /// `Err` only when the bytes are not a transaction. Malformed envelopes
    /// and payloads are recorded in the affected [`OutputReport::error`].
    pub fn inspect(&self, raw: &[u8]) -> Result<TransactionReport, InspectError> {
        let transaction = Transaction::from_bytes(raw)?;
        let range = transaction.byte_range;
        let txid = range
            .slice(raw)
            .map_or_else(|| transaction.tx_id(), ChainHash::digest);

        let inputs = transaction
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| self.input_report(raw, index, input))
            .collect();
        let outputs = transaction
            .outputs
            .iter()
            .enumerate()
            .map(|(index, output)| self.output_report(raw, index, output))
            .collect();

        Ok(TransactionReport {
            txid,
            size: range.len(),
            transaction,
            inputs,
            outputs,
        })
    }

    pub fn inspect_hex(&self, hex_str: &str) -> Result<TransactionReport, InspectError> {
        let raw = hex::decode(hex_str).map_err(txscope_transaction::TransactionError::from)?;
        self.inspect(&raw)
    }

    /// Inspect each buffer independently; one failure does not affect the
    /// others.
    pub fn inspect_batch<I>(&self, raws: I) -> Vec<Result<TransactionReport, InspectError>>
    where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        raws.into_iter()
            .enumerate()
            .map(|(i, raw)| {
                let result = self.inspect(raw.as_ref());
                if let Err(e) = &result {
                    log::warn!("batch item {}: {}", i, e);
                }
                result
            })
            .collect()
    }

    /// Follow what a decoded message carries.
    ///
    /// `value` may be the message itself or a `Message` action holding it.
    /// Embedded transactions are inspected in full; a settlement action
    /// script is classified and its envelope decoded. Each step goes one
    /// level deeper.
    ///
    /// # Returns
    /// `Ok(None)` when nothing is embedded, `RecursionLimitExceeded` when the
    /// depth bound is reached.
    pub fn resolve_embedded(&self, value: &DecodedValue) -> Result<Option<Embedded>, InspectError> {
        let message = match value.kind {
            SchemaKind::Messages => value,
            _ => match value.message.as_deref() {
                Some(message) => message,
                None => return Ok(None),
            },
        };

        if let Some(raw) = message.embedded_transaction() {
            let report = self.nested()?.inspect(raw)?;
            return Ok(Some(Embedded::Transaction(Box::new(report))));
        }
        if let Some(raw) = message.embedded_action_script() {
            let nested = self.nested()?;
            let script = Script::from_bytes(raw);
            let payload = decode_output_script(&script, nested.encoder)?;
            let content = match &payload {
                Some(Payload::Envelope(envelope)) => envelope.content(&nested.ctx)?,
                _ => None,
            };
            return Ok(Some(Embedded::ActionScript { payload, content }));
        }
        Ok(None)
    }

    fn input_report(&self, raw: &[u8], index: usize, input: &TransactionInput) -> InputReport {
        InputReport {
            index,
            byte_range: input.byte_range,
            raw_hex: range_hex(raw, input.byte_range),
            payload: decode_input_script(&input.unlocking_script, self.encoder),
        }
    }

    fn output_report(&self, raw: &[u8], index: usize, output: &TransactionOutput) -> OutputReport {
        let mut report = OutputReport {
            index,
            satoshis: output.satoshis,
            byte_range: output.byte_range,
            raw_hex: range_hex(raw, output.byte_range),
            payload: None,
            content: None,
            embedded: None,
            error: None,
        };
        if let Err(e) = self.classify_output(output, &mut report) {
            log::warn!("output {}: {}", index, e);
            report.error = Some(e.to_string());
        }
        report
    }

    fn classify_output(
        &self,
        output: &TransactionOutput,
        report: &mut OutputReport,
    ) -> Result<(), InspectError> {
        report.payload = decode_output_script(&output.locking_script, self.encoder)?;
        if let Some(Payload::Envelope(envelope)) = &report.payload {
            report.content = envelope.content(&self.ctx)?;
        }
        if let Some(content) = &report.content {
            report.embedded = self.resolve_embedded(content)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Inspect one raw transaction with default settings.
pub fn inspect(raw: &[u8], schemas: &SchemaSet) -> Result<TransactionReport, InspectError> {
    Inspector::new(schemas).inspect(raw)
}

/// Inspect many raw transactions with default settings.
pub fn inspect_batch<I>(raws: I, schemas: &SchemaSet) -> Vec<Result<TransactionReport, InspectError>>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    Inspector::new(schemas).inspect_batch(raws)
}

/// Index of the input in `tx` spending output `index` of `prev_txid`.
pub fn find_spending_input(tx: &Transaction, prev_txid: &ChainHash, index: u32) -> Option<usize> {
    tx.find_spending_input(prev_txid, index)
}
