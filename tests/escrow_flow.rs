use rust_decimal_macros::dec;
use taskpay::domain::ports::ContentReference;
use taskpay::infrastructure::cipher::generate_keypair;
use taskpay::infrastructure::in_memory::InMemoryLedger;
use taskpay::{Address, Cents, EscrowContract, EscrowError, JobMode, Manifest, RequestType};

fn a_manifest(number_of_tasks: u64) -> Manifest {
    Manifest {
        job_mode: JobMode::Batch,
        request_type: RequestType::ImageLabelBinary,
        task_bid_price: dec!(1.0),
        oracle_stake: dec!(0.05),
        job_total_tasks: number_of_tasks,
        minimum_trust_server: dec!(0.1),
        minimum_trust_client: dec!(0.1),
        recording_oracle_addr: Address::parse("0xd979105297fb0eee83f7433fc09279cb5b94ffc6")
            .unwrap(),
        reputation_oracle_addr: Address::parse("0x61f9f0b31eacb420553da8bcc59dc617279731ac")
            .unwrap(),
        instant_result_delivery_webhook: "http://example.com/webback".to_string(),
        taskdata_uri: "http://example.com/taskdata.json".to_string(),
    }
}

fn to_addr() -> Address {
    Address::parse("0x6b7e3c31f34cf38d1dfc1d9a8a59482028395809").unwrap()
}

fn to_addr2() -> Address {
    Address::parse("0xa30e4681db25f0f32e8c79b28f2a80a653a556a2").unwrap()
}

#[tokio::test]
async fn full_lifecycle_deploy_fund_payout_bulk() {
    let ledger = InMemoryLedger::new();
    let mut contract = EscrowContract::new(a_manifest(100), Box::new(ledger.clone()));
    let keys = generate_keypair();
    let results = ContentReference::new("results-batch-1");

    contract.deploy(&keys).await.unwrap();
    let init = ledger.initialize_calls().await;
    assert_eq!(init.len(), 1);
    assert_eq!(init[0].amount, Cents::new(10_000));
    assert_eq!(init[0].oracle_stake, Cents::new(5));
    assert_eq!(init[0].num_answers, 100);

    contract.fund().await.unwrap();
    let transfers = ledger.transfers().await;
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].amount, Cents::new(10_000));
    assert_eq!(Some(&transfers[0].to), contract.ledger_address());

    contract
        .payout(dec!(1.0), &to_addr(), &results, &keys)
        .await
        .unwrap();
    let payouts = ledger.partial_payouts().await;
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].amount, Cents::new(100));
    assert_eq!(payouts[0].recipient, to_addr());

    contract
        .bulk_payout(
            &[to_addr(), to_addr2()],
            &[dec!(10), dec!(20)],
            &results,
            &keys,
        )
        .await
        .unwrap();
    let batches = ledger.bulk_payouts().await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].amounts, vec![Cents::new(1_000), Cents::new(2_000)]);
    assert_eq!(batches[0].recipients, vec![to_addr(), to_addr2()]);

    assert_eq!(contract.cumulative_paid(), Cents::new(3_100));
}

#[tokio::test]
async fn lifecycle_misuse_is_rejected_in_order() {
    let mut contract = EscrowContract::new(a_manifest(10), Box::new(InMemoryLedger::new()));
    let keys = generate_keypair();
    let results = ContentReference::new("r");

    assert!(matches!(contract.fund().await, Err(EscrowError::NotDeployed)));
    assert!(matches!(
        contract.payout(dec!(1.0), &to_addr(), &results, &keys).await,
        Err(EscrowError::NotDeployed)
    ));

    contract.deploy(&keys).await.unwrap();
    assert!(matches!(
        contract.deploy(&keys).await,
        Err(EscrowError::AlreadyDeployed)
    ));
    assert!(matches!(
        contract.payout(dec!(1.0), &to_addr(), &results, &keys).await,
        Err(EscrowError::NotFunded)
    ));

    contract.fund().await.unwrap();
    assert!(matches!(contract.fund().await, Err(EscrowError::AlreadyFunded)));
}

#[tokio::test]
async fn escrow_can_be_drained_exactly_but_never_overdrawn() {
    let ledger = InMemoryLedger::new();
    let mut contract = EscrowContract::new(a_manifest(4), Box::new(ledger.clone()));
    let keys = generate_keypair();
    let results = ContentReference::new("r");

    contract.deploy(&keys).await.unwrap();
    contract.fund().await.unwrap();

    // Total escrow is 400 cents across 4 slots.
    contract
        .bulk_payout(&[to_addr(), to_addr2()], &[dec!(1.5), dec!(1.5)], &results, &keys)
        .await
        .unwrap();
    assert!(matches!(
        contract
            .payout(dec!(1.01), &to_addr(), &results, &keys)
            .await,
        Err(EscrowError::Overdraft { .. })
    ));
    contract
        .payout(dec!(1.0), &to_addr(), &results, &keys)
        .await
        .unwrap();

    assert_eq!(contract.cumulative_paid(), Cents::new(400));
    assert_eq!(contract.cumulative_paid(), contract.amount());

    // One slot is left but the balance is gone.
    assert!(matches!(
        contract.payout(dec!(0.01), &to_addr(), &results, &keys).await,
        Err(EscrowError::Overdraft { .. })
    ));
}

#[tokio::test]
async fn independent_contracts_do_not_share_state() {
    let ledger_a = InMemoryLedger::new();
    let ledger_b = InMemoryLedger::new();
    let mut a = EscrowContract::new(a_manifest(10), Box::new(ledger_a.clone()));
    let mut b = EscrowContract::new(a_manifest(20), Box::new(ledger_b.clone()));
    let keys = generate_keypair();

    a.deploy(&keys).await.unwrap();
    b.deploy(&keys).await.unwrap();
    a.fund().await.unwrap();

    assert!(a.is_funded());
    assert!(!b.is_funded());
    assert_eq!(ledger_a.transfers().await.len(), 1);
    assert!(ledger_b.transfers().await.is_empty());
    assert_eq!(a.amount(), Cents::new(1_000));
    assert_eq!(b.amount(), Cents::new(2_000));
}
