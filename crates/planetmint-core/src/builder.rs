//! Transaction assembly.
//!
//! [`TransactionBuilder`] collects assets, outputs, inputs, metadata and the
//! operation tag, then [`TransactionBuilder::build`] fills in the defaults and
//! hands back an [`UnsignedTransaction`]. Nothing is validated until `build`,
//! so the fluent chain itself never fails.

use planetmint_canonical::{Amount, TransactionId};
use serde::Serialize;
use serde_json::Value;

use crate::condition::Condition;
use crate::errors::CoreError;
use crate::keys::{PublicKey, TransactionSigner};
use crate::signing::{SignedTransaction, Signer};
use crate::transaction::{Asset, Fulfills, Input, MetaData, Operation, Output, Transaction};

/// Transaction model version written by default (Planetmint).
pub const DEFAULT_VERSION: &str = "3.0";

/// Options for transaction building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Value written to `version` (default: `"3.0"`).
    pub version: String,
    /// Whether CREATE inputs must lack and TRANSFER inputs must carry a
    /// `fulfills` back-reference (default: true).
    pub enforce_back_references: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            enforce_back_references: true,
        }
    }
}

/// Owner of an output or input that may be the not-yet-known acting key.
#[derive(Debug, Clone, Copy)]
enum Owner {
    Acting,
    Key(PublicKey),
}

impl Owner {
    fn resolve(self, acting: &PublicKey) -> PublicKey {
        match self {
            Owner::Acting => *acting,
            Owner::Key(key) => key,
        }
    }
}

#[derive(Debug, Clone)]
struct PendingOutput {
    amount: String,
    owner: Owner,
}

#[derive(Debug, Clone)]
struct PendingInput {
    fulfillment: Option<String>,
    fulfills: Option<Fulfills>,
    owner: Owner,
}

/// Incremental builder for CREATE and TRANSFER transactions.
///
/// # Example
///
/// ```rust
/// use planetmint_core::{Keypair, TransactionBuilder};
///
/// let keypair = Keypair::generate();
/// let signed = TransactionBuilder::<&str, ()>::new()
///     .operation("CREATE")
///     .add_asset("hello")
///     .build_and_sign(&keypair)?;
///
/// assert_eq!(signed.transaction().outputs[0].amount.as_str(), "1");
/// # Ok::<(), planetmint_core::CoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder<A = Value, M = Value> {
    operation: Option<String>,
    assets: Vec<Asset<A>>,
    outputs: Vec<PendingOutput>,
    inputs: Vec<PendingInput>,
    metadata: Option<MetaData<M>>,
    options: BuildOptions,
}

impl<A, M> Default for TransactionBuilder<A, M> {
    fn default() -> Self {
        Self::with_options(BuildOptions::default())
    }
}

impl<A, M> TransactionBuilder<A, M> {
    /// Empty builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty builder with explicit options.
    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            operation: None,
            assets: Vec::new(),
            outputs: Vec::new(),
            inputs: Vec::new(),
            metadata: None,
            options,
        }
    }

    /// Sets the operation tag; checked at [`build`](Self::build).
    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Adds one single-owner output per key, each with its own condition.
    ///
    /// Several keys produce several independent outputs, not a shared
    /// multi-signature output.
    pub fn add_output(mut self, amount: impl Into<String>, public_keys: &[PublicKey]) -> Self {
        let amount = amount.into();
        self.outputs.extend(public_keys.iter().map(|key| PendingOutput {
            amount: amount.clone(),
            owner: Owner::Key(*key),
        }));
        self
    }

    /// Adds an output owned by the key the transaction is built with.
    pub fn add_output_to_self(mut self, amount: impl Into<String>) -> Self {
        self.outputs.push(PendingOutput {
            amount: amount.into(),
            owner: Owner::Acting,
        });
        self
    }

    /// Adds one input per owner key. `fulfillment` is a placeholder that the
    /// signer overwrites.
    pub fn add_input(
        mut self,
        fulfillment: Option<String>,
        fulfills: Option<Fulfills>,
        owners_before: &[PublicKey],
    ) -> Self {
        self.inputs
            .extend(owners_before.iter().map(|key| PendingInput {
                fulfillment: fulfillment.clone(),
                fulfills: fulfills.clone(),
                owner: Owner::Key(*key),
            }));
        self
    }

    /// Spends `fulfills`, owned by the key the transaction is built with.
    pub fn spend(mut self, fulfills: Fulfills) -> Self {
        self.inputs.push(PendingInput {
            fulfillment: None,
            fulfills: Some(fulfills),
            owner: Owner::Acting,
        });
        self
    }

    /// Appends an inline asset body.
    pub fn add_asset(mut self, data: A) -> Self {
        self.assets.push(Asset::Data { data });
        self
    }

    /// Appends a reference to the asset minted by `create_id`.
    pub fn add_asset_reference(mut self, create_id: TransactionId) -> Self {
        self.assets.push(Asset::Reference { id: create_id });
        self
    }

    /// Sets metadata, replacing any earlier value.
    pub fn add_metadata(mut self, value: M) -> Self {
        self.metadata = Some(MetaData { value });
        self
    }

    /// Finalizes the skeleton for `acting_key`.
    ///
    /// Without outputs, one output of `"1"` to `acting_key` is added; without
    /// inputs, one input with no back-reference owned by `acting_key` is
    /// added. `id` is left absent.
    pub fn build(self, acting_key: &PublicKey) -> Result<UnsignedTransaction<A, M>, CoreError> {
        let operation: Operation = self
            .operation
            .as_deref()
            .unwrap_or_default()
            .parse()?;

        let mut outputs = self.outputs;
        if outputs.is_empty() {
            outputs.push(PendingOutput {
                amount: Amount::one().to_string(),
                owner: Owner::Acting,
            });
        }
        let outputs = outputs
            .into_iter()
            .map(|pending| {
                let amount = Amount::parse(pending.amount).map_err(CoreError::InvalidAmount)?;
                let owner = pending.owner.resolve(acting_key);
                Ok(Output {
                    amount,
                    condition: Condition::ed25519(&owner),
                    public_keys: vec![owner.to_base58()],
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let mut inputs = self.inputs;
        if inputs.is_empty() {
            inputs.push(PendingInput {
                fulfillment: None,
                fulfills: None,
                owner: Owner::Acting,
            });
        }
        let inputs: Vec<Input> = inputs
            .into_iter()
            .map(|pending| Input {
                fulfillment: pending.fulfillment,
                fulfills: pending.fulfills,
                owners_before: vec![pending.owner.resolve(acting_key).to_base58()],
            })
            .collect();

        if self.options.enforce_back_references {
            check_back_references(operation, &inputs)?;
        } else {
            tracing::warn!(%operation, "back-reference checks disabled; transaction is unchecked");
        }

        tracing::debug!(
            %operation,
            outputs = outputs.len(),
            inputs = inputs.len(),
            version = %self.options.version,
            "transaction finalized"
        );

        Ok(UnsignedTransaction {
            transaction: Transaction {
                id: None,
                operation,
                version: self.options.version,
                assets: self.assets,
                outputs,
                inputs,
                metadata: self.metadata,
            },
        })
    }
}

impl<A: Serialize, M: Serialize> TransactionBuilder<A, M> {
    /// Builds for the signer's public key and signs in one step.
    pub fn build_and_sign<S>(self, signer: &S) -> Result<SignedTransaction<A, M>, CoreError>
    where
        S: TransactionSigner + ?Sized,
    {
        self.build(&signer.public_key())?.sign(signer)
    }
}

/// CREATE inputs spend nothing; TRANSFER inputs must name what they spend.
pub fn check_back_references(operation: Operation, inputs: &[Input]) -> Result<(), CoreError> {
    for (index, input) in inputs.iter().enumerate() {
        match (operation, &input.fulfills) {
            (Operation::Create, Some(_)) => {
                return Err(CoreError::InputReference {
                    index,
                    reason: "CREATE input must not reference a prior output".to_string(),
                })
            }
            (Operation::Transfer, None) => {
                return Err(CoreError::InputReference {
                    index,
                    reason: "TRANSFER input must reference the output it spends".to_string(),
                })
            }
            _ => {}
        }
    }
    Ok(())
}

/// A finalized transaction whose inputs are not yet signed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTransaction<A = Value, M = Value> {
    transaction: Transaction<A, M>,
}

impl<A, M> UnsignedTransaction<A, M> {
    /// Wraps an existing transaction, clearing its id and fulfillments.
    pub fn from_transaction(mut transaction: Transaction<A, M>) -> Self {
        transaction.id = None;
        for input in &mut transaction.inputs {
            input.fulfillment = None;
        }
        Self { transaction }
    }

    /// Read access to the skeleton.
    pub fn transaction(&self) -> &Transaction<A, M> {
        &self.transaction
    }

    /// Releases the skeleton, e.g. to hand it to an external signer.
    pub fn into_transaction(self) -> Transaction<A, M> {
        self.transaction
    }
}

impl<A: Serialize, M: Serialize> UnsignedTransaction<A, M> {
    /// Signs every input with `signer` and assigns the id.
    pub fn sign<S>(self, signer: &S) -> Result<SignedTransaction<A, M>, CoreError>
    where
        S: TransactionSigner + ?Sized,
    {
        Signer::default().sign(self, signer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Keypair;

    fn key() -> PublicKey {
        Keypair::generate().public_key()
    }

    fn prior_id() -> TransactionId {
        TransactionId::parse("a71446edd12867678f554da2e8ede65595223ee27be70af04c26f2a56c36b173")
            .unwrap()
    }

    #[test]
    fn create_defaults_to_one_output_and_one_input() {
        let acting = key();
        let unsigned = TransactionBuilder::<&str, ()>::new()
            .operation("CREATE")
            .add_asset("hello")
            .build(&acting)
            .unwrap();
        let tx = unsigned.transaction();

        assert_eq!(tx.id, None);
        assert_eq!(tx.version, "3.0");
        assert_eq!(tx.outputs.len(), 1);
        assert_eq!(tx.outputs[0].amount.as_str(), "1");
        assert_eq!(tx.outputs[0].public_keys, vec![acting.to_base58()]);
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.inputs[0].fulfills, None);
        assert_eq!(tx.inputs[0].owners_before, vec![acting.to_base58()]);
    }

    #[test]
    fn several_keys_give_independent_outputs() {
        let (a, b) = (key(), key());
        let unsigned = TransactionBuilder::<&str, ()>::new()
            .operation("CREATE")
            .add_output("5", &[a, b])
            .build(&key())
            .unwrap();
        let outputs = &unsigned.transaction().outputs;
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].public_keys, vec![a.to_base58()]);
        assert_eq!(outputs[1].public_keys, vec![b.to_base58()]);
        assert_ne!(outputs[0].condition.uri, outputs[1].condition.uri);
        assert!(outputs.iter().all(|o| o.amount.as_str() == "5"));
    }

    #[test]
    fn unknown_or_missing_operation_is_rejected() {
        let err = TransactionBuilder::<&str, ()>::new()
            .operation("BURN")
            .build(&key())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation(op) if op == "BURN"));

        let err = TransactionBuilder::<&str, ()>::new().build(&key()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation(_)));
    }

    #[test]
    fn bad_amount_is_rejected_at_build() {
        let err = TransactionBuilder::<&str, ()>::new()
            .operation("CREATE")
            .add_output("-3", &[key()])
            .build(&key())
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount(_)));
    }

    #[test]
    fn transfer_without_back_reference_fails_by_default() {
        let err = TransactionBuilder::<&str, ()>::new()
            .operation("TRANSFER")
            .build(&key())
            .unwrap_err();
        assert!(matches!(err, CoreError::InputReference { index: 0, .. }));
    }

    #[test]
    fn create_with_back_reference_fails_by_default() {
        let acting = key();
        let err = TransactionBuilder::<&str, ()>::new()
            .operation("CREATE")
            .add_input(None, Some(Fulfills::new(prior_id(), 0)), &[acting])
            .build(&acting)
            .unwrap_err();
        assert!(matches!(err, CoreError::InputReference { index: 0, .. }));
    }

    #[test]
    fn disabled_enforcement_builds_unchecked_transfer() {
        let options = BuildOptions {
            enforce_back_references: false,
            ..BuildOptions::default()
        };
        let unsigned = TransactionBuilder::<&str, ()>::with_options(options)
            .operation("TRANSFER")
            .build(&key())
            .unwrap();
        assert_eq!(unsigned.transaction().inputs[0].fulfills, None);
    }

    #[test]
    fn metadata_is_replaced_not_appended() {
        let unsigned = TransactionBuilder::<&str, u32>::new()
            .operation("CREATE")
            .add_metadata(1)
            .add_metadata(2)
            .build(&key())
            .unwrap();
        assert_eq!(unsigned.transaction().metadata, Some(MetaData { value: 2 }));
    }

    #[test]
    fn transfer_keeps_input_order() {
        let acting = key();
        let unsigned = TransactionBuilder::<&str, ()>::new()
            .operation("TRANSFER")
            .add_asset_reference(prior_id())
            .spend(Fulfills::new(prior_id(), 1))
            .spend(Fulfills::new(prior_id(), 0))
            .add_output("1", &[key()])
            .build(&acting)
            .unwrap();
        let indexes: Vec<u32> = unsigned
            .transaction()
            .inputs
            .iter()
            .map(|i| i.fulfills.as_ref().unwrap().output_index)
            .collect();
        assert_eq!(indexes, vec![1, 0]);
        assert_eq!(
            unsigned.transaction().assets,
            vec![Asset::Reference { id: prior_id() }]
        );
    }
}
