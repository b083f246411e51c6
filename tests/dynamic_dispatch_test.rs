use payment_lifecycle::domain::payment::{PaymentEntity, PaymentEntryEntity, PaymentStatus};
use payment_lifecycle::domain::ports::{PaymentEntryStoreBox, PaymentStoreBox, TransactionStoreBox};
use payment_lifecycle::domain::transaction::TransactionEntity;
use payment_lifecycle::infrastructure::in_memory::{
    InMemoryPaymentEntryStore, InMemoryPaymentStore, InMemoryTransactionStore,
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let payment_store: PaymentStoreBox = Box::new(InMemoryPaymentStore::new());
    let entry_store: PaymentEntryStoreBox = Box::new(InMemoryPaymentEntryStore::new());
    let transaction_store: TransactionStoreBox = Box::new(InMemoryTransactionStore::new());

    let payment = PaymentEntity {
        client_id: "CLIENT1".to_string(),
        status: Some(PaymentStatus::Complete),
        ..Default::default()
    };
    let entry = PaymentEntryEntity {
        payment_id: 1,
        sequence_no: 1,
        transaction_amt: dec!(100.0),
        ..Default::default()
    };

    // Verify Send + Sync by spawning tasks
    let payment_handle = tokio::spawn(async move {
        let id = payment_store.next_id().await.unwrap();
        payment_store
            .store(PaymentEntity { id, ..payment })
            .await
            .unwrap();
        payment_store.get(id).await.unwrap().unwrap()
    });

    let entry_handle = tokio::spawn(async move {
        entry_store.store(entry.clone()).await.unwrap();
        assert!(entry_store.store(entry).await.is_err());
        entry_store.get_by_payment(1).await.unwrap()
    });

    let transaction_handle = tokio::spawn(async move {
        let id = transaction_store
            .insert(TransactionEntity::default())
            .await
            .unwrap();
        transaction_store.get(id).await.unwrap().unwrap()
    });

    let retrieved_payment = payment_handle.await.unwrap();
    assert_eq!(retrieved_payment.client_id, "CLIENT1");

    let retrieved_entries = entry_handle.await.unwrap();
    assert_eq!(retrieved_entries.len(), 1);
    assert_eq!(retrieved_entries[0].transaction_amt, dec!(100.0));

    let retrieved_tx = transaction_handle.await.unwrap();
    assert_eq!(retrieved_tx.id, 1);
}
