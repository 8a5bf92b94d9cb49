use planetmint_core::{
    condition_uri, CoreError, Fulfills, Keypair, SignedTransaction, TransactionBuilder,
    TransactionSigner, UnsignedTransaction, Verifier, VerificationVerdict,
};
use planetmint_core::{BuildOptions, Canonicalizer, PublicKey, TransactionId};
use serde_json::{json, Value};

const SEED: &str = "6f6b0cd095f1e83fc5f08bffb79c7c8a30e77a3ab65f4bc659026b76394fcea8";
const PUBLIC_B58: &str = "4V5MGAcoiqDFyjxaY1S4cB3aFpJX2EqREde61YXMHDLv";
const CREATE_ID: &str = "a71446edd12867678f554da2e8ede65595223ee27be70af04c26f2a56c36b173";
const CREATE_FULFILLMENT: &str = "pGSAIDPEPcIYCTaiqROKBfBsiS0vsc_aRWLLw1NzvxPNjtNzgUCz-XJt9cX_J237Q_TQVpiLTw0B7fwUm-qegwgkEAxOnfl4uLRKkcZ7ns6G765A20Z4Fch22gfO9B0J1Da4iNUK";
const TRANSFER_ID: &str = "116b339fa17c56fb5c991cbe0549c953829d1f87c07b6d8a7f9522763206086b";
const TRANSFER_FULFILLMENT: &str = "pGSAIDPEPcIYCTaiqROKBfBsiS0vsc_aRWLLw1NzvxPNjtNzgUDX86W6Wp4zNeeL5ye_d_ozDOn0-5BIfw5oDyy8E_gw50BDdMoY1AGw9c3sD-I-kIIT9oubFgmLhbfxny_f5WkI";

fn make_keypair() -> Keypair {
    Keypair::from_seed(&hex::decode(SEED).unwrap()).unwrap()
}

fn make_create(keypair: &Keypair) -> SignedTransaction {
    TransactionBuilder::<Value, Value>::new()
        .operation("CREATE")
        .add_asset(json!("hello"))
        .build_and_sign(keypair)
        .unwrap()
}

fn make_transfer(keypair: &Keypair, create_id: &TransactionId) -> SignedTransaction {
    TransactionBuilder::<Value, Value>::new()
        .operation("TRANSFER")
        .add_asset_reference(create_id.clone())
        .spend(Fulfills::new(create_id.clone(), 0))
        .add_metadata(json!({"note": "moved"}))
        .build_and_sign(keypair)
        .unwrap()
}

#[test]
fn create_matches_golden_vector() {
    let signed = make_create(&make_keypair());
    let tx = signed.transaction();

    assert_eq!(signed.id().as_str(), CREATE_ID);
    assert_eq!(tx.inputs[0].fulfillment.as_deref(), Some(CREATE_FULFILLMENT));
    assert_eq!(tx.outputs[0].public_keys[0].as_str(), PUBLIC_B58);
    assert_eq!(
        tx.outputs[0].condition.uri,
        "ni:///sha-256;IbshYc9pA45ORoyn53s7bA2a-df2c5j90emaBzQtsp0?fpt=ed25519-sha-256&cost=131072"
    );

    let expected_wire = format!(
        concat!(
            r#"{{"assets":[{{"data":"hello"}}],"id":"{id}","inputs":[{{"fulfillment":"{ful}","fulfills":null,"owners_before":["{pk}"]}}],"#,
            r#""metadata":null,"operation":"CREATE","outputs":[{{"amount":"1","condition":{{"details":{{"public_key":"{pk}","type":"ed25519-sha-256"}},"#,
            r#""uri":"ni:///sha-256;IbshYc9pA45ORoyn53s7bA2a-df2c5j90emaBzQtsp0?fpt=ed25519-sha-256&cost=131072"}},"public_keys":["{pk}"]}}],"version":"3.0"}}"#
        ),
        id = CREATE_ID,
        ful = CREATE_FULFILLMENT,
        pk = PUBLIC_B58
    );
    assert_eq!(String::from_utf8(signed.to_wire().to_vec()).unwrap(), expected_wire);
}

#[test]
fn non_ascii_asset_matches_golden_vector() {
    let keypair = make_keypair();
    let signed = TransactionBuilder::<Value, Value>::new()
        .operation("CREATE")
        .add_asset(json!("h\u{e9}llo"))
        .build_and_sign(&keypair)
        .unwrap();

    assert_eq!(
        signed.id().as_str(),
        "2c32fd80ac2b2c2f54862ce68ebe3aa58ce57f6884bffc2396246e56f91a759a"
    );
    assert_eq!(
        signed.transaction().inputs[0].fulfillment.as_deref(),
        Some("pGSAIDPEPcIYCTaiqROKBfBsiS0vsc_aRWLLw1NzvxPNjtNzgUDlAJ5mTXem6EBfRX2qF5cJFOCkDSPwHDFxTseC4BcpgqU6C3LxTG8RD5WutN4lV2eb-1IeR0j_kS6pitNoCj4O")
    );
    let wire = String::from_utf8(signed.to_wire().to_vec()).unwrap();
    assert!(wire.starts_with("{\"assets\":[{\"data\":\"h\u{e9}llo\"}]"));
}

#[test]
fn transfer_matches_golden_vector_and_spends_create() {
    let keypair = make_keypair();
    let create = make_create(&keypair);
    let transfer = make_transfer(&keypair, create.id());

    assert_eq!(transfer.id().as_str(), TRANSFER_ID);
    assert_eq!(
        transfer.transaction().inputs[0].fulfillment.as_deref(),
        Some(TRANSFER_FULFILLMENT)
    );

    let report = Verifier::default()
        .verify_spend(transfer.transaction(), 0, &create.transaction().outputs[0])
        .unwrap();
    assert_eq!(report.verdict, VerificationVerdict::Ok, "{:?}", report.violations);
}

#[test]
fn signed_transactions_verify() {
    let keypair = Keypair::generate();
    let signed = TransactionBuilder::<Value, Value>::new()
        .operation("CREATE")
        .add_asset(json!({"serial": "A-17"}))
        .add_metadata(json!({"batch": 3}))
        .add_output("10", &[keypair.public_key(), Keypair::generate().public_key()])
        .build_and_sign(&keypair)
        .unwrap();

    let report = Verifier::default().verify(signed.transaction()).unwrap();
    assert!(report.is_ok(), "{:?}", report.violations);
}

#[test]
fn resigning_is_deterministic() {
    let keypair = make_keypair();
    let signed = make_create(&keypair);
    let again = signed.to_unsigned().sign(&keypair).unwrap();

    assert_eq!(again.id(), signed.id());
    assert_eq!(again.to_wire(), signed.to_wire());
}

#[test]
fn changing_any_field_changes_the_id() {
    let keypair = make_keypair();
    let base = make_create(&keypair);

    let mut tx = base.transaction().clone();
    tx.version = "2.0".to_string();
    let changed = UnsignedTransaction::from_transaction(tx)
        .sign(&keypair)
        .unwrap();
    assert_ne!(changed.id(), base.id());

    let with_metadata = TransactionBuilder::<Value, Value>::new()
        .operation("CREATE")
        .add_asset(json!("hello"))
        .add_metadata(json!({"k": "v"}))
        .build_and_sign(&keypair)
        .unwrap();
    assert_ne!(with_metadata.id(), base.id());
}

#[test]
fn inputs_sign_their_own_back_references() {
    let keypair = make_keypair();
    let prior = TransactionId::parse(CREATE_ID).unwrap();
    let signed = TransactionBuilder::<Value, Value>::new()
        .operation("TRANSFER")
        .add_asset_reference(prior.clone())
        .spend(Fulfills::new(prior.clone(), 0))
        .spend(Fulfills::new(prior, 1))
        .build_and_sign(&keypair)
        .unwrap();

    let inputs = &signed.transaction().inputs;
    assert_ne!(inputs[0].fulfillment, inputs[1].fulfillment);

    let report = Verifier::default().verify(signed.transaction()).unwrap();
    assert!(report.is_ok(), "{:?}", report.violations);
}

#[test]
fn tampering_is_reported() {
    let keypair = make_keypair();
    let signed = make_create(&keypair);

    let mut tx = signed.transaction().clone();
    tx.inputs[0].fulfillment = make_transfer(&keypair, signed.id()).transaction().inputs[0]
        .fulfillment
        .clone();
    let report = Verifier::default().verify(&tx).unwrap();
    assert_eq!(report.verdict, VerificationVerdict::Invalid);
    assert!(report
        .violations
        .iter()
        .any(|v| v.location == "inputs[0]" && v.reason.contains("signature")));

    let mut tx = signed.transaction().clone();
    tx.outputs[0].condition.uri = condition_uri(&Keypair::generate().public_key());
    let report = Verifier::default().verify(&tx).unwrap();
    assert!(report.violations.iter().any(|v| v.location == "outputs[0]"));
    assert!(report.violations.iter().any(|v| v.location == "id"));
}

#[test]
fn unchecked_transfer_is_flagged_by_verifier() {
    let keypair = make_keypair();
    let options = BuildOptions {
        enforce_back_references: false,
        ..BuildOptions::default()
    };
    let signed = TransactionBuilder::<Value, Value>::with_options(options)
        .operation("TRANSFER")
        .build_and_sign(&keypair)
        .unwrap();

    let report = Verifier::new(Canonicalizer::new())
        .verify(signed.transaction())
        .unwrap();
    assert_eq!(report.verdict, VerificationVerdict::Invalid);
    assert!(report
        .violations
        .iter()
        .any(|v| v.reason.contains("must reference")));
}

#[test]
fn wrong_owner_cannot_spend() {
    let owner = make_keypair();
    let thief = Keypair::generate();
    let create = make_create(&owner);
    let transfer = make_transfer(&thief, create.id());

    let report = Verifier::default()
        .verify_spend(transfer.transaction(), 0, &create.transaction().outputs[0])
        .unwrap();
    assert_eq!(report.verdict, VerificationVerdict::Invalid);
    assert!(report
        .violations
        .iter()
        .all(|v| v.location == "inputs[0]"));
}

#[test]
fn float_payloads_cannot_be_signed() {
    let err = TransactionBuilder::<Value, Value>::new()
        .operation("CREATE")
        .add_asset(json!({"weight": 1.5}))
        .build_and_sign(&make_keypair())
        .unwrap_err();
    assert!(matches!(err, CoreError::Encoding(_)));
}

#[test]
fn shared_signer_serves_parallel_builds() {
    let keypair = make_keypair();
    let signer: &dyn TransactionSigner = &keypair;
    let ids: Vec<TransactionId> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                scope.spawn(move || {
                    TransactionBuilder::<Value, Value>::new()
                        .operation("CREATE")
                        .add_asset(json!({ "n": n }))
                        .build_and_sign(signer)
                        .unwrap()
                        .id()
                        .clone()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let public: PublicKey = keypair.public_key();
    assert_eq!(public.to_base58().as_str(), PUBLIC_B58);
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
