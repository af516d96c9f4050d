//! Macro-generated test suite for `InvoiceStore` contract validation.
//!
//! # Generated Tests
//!
//! - `test_insert_then_list_round_trip`: the reference invoice comes back unchanged
//! - `test_full_invoice_round_trip`: every field survives storage
//! - `test_list_empty`: empty store lists nothing
//! - `test_list_multiple`: five inserts, five listed
//! - `test_ids_are_unique`: each insert gets its own identifier
//! - `test_delete_existing`: removes exactly that record
//! - `test_delete_absent_is_ok`: deleting twice succeeds, listing unaffected
//! - `test_delete_malformed_id_fails`: garbage identifier is a persistence error
//! - `test_concurrent_inserts`: parallel inserts from spawned tasks

/// Generate a full `InvoiceStore` conformance test suite.
///
/// `$factory` must evaluate to an empty store implementing
/// `InvoiceStore + Clone + 'static`. It is re-evaluated for each test.
#[macro_export]
macro_rules! invoice_store_tests {
    ($factory:expr) => {
        mod invoice_store_contract_tests {
            use super::*;
            use invoice_ledger::core::{InvoiceId, InvoiceStore, StoreError};

            #[tokio::test]
            async fn test_insert_then_list_round_trip() {
                let store = $factory;

                let id = store.insert(reference_invoice()).await.unwrap();

                let all = store.list_all().await.unwrap();
                assert_count(&all, 1);
                assert_eq!(all[0].id, id);
                assert_eq!(all[0].invoice, reference_invoice());
            }

            #[tokio::test]
            async fn test_full_invoice_round_trip() {
                let store = $factory;

                store.insert(full_invoice()).await.unwrap();

                let all = store.list_all().await.unwrap();
                assert_count(&all, 1);
                assert_eq!(all[0].invoice, full_invoice());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;

                let all = store.list_all().await.unwrap();
                assert!(all.is_empty(), "List on empty store should return empty vec");
            }

            #[tokio::test]
            async fn test_list_multiple() {
                let store = $factory;
                for invoice in sample_batch(5) {
                    store.insert(invoice).await.unwrap();
                }

                let all = store.list_all().await.unwrap();
                assert_count(&all, 5);
                assert_eq!(
                    sorted_numbers(&all),
                    vec![Some(1), Some(2), Some(3), Some(4), Some(5)]
                );
            }

            #[tokio::test]
            async fn test_ids_are_unique() {
                let store = $factory;

                let a = store.insert(sample_invoice(1)).await.unwrap();
                let b = store.insert(sample_invoice(1)).await.unwrap();

                assert_ne!(a, b, "Identical invoices must still get distinct ids");
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let keep_a = store.insert(sample_invoice(1)).await.unwrap();
                let target = store.insert(sample_invoice(2)).await.unwrap();
                let keep_b = store.insert(sample_invoice(3)).await.unwrap();

                store.delete_by_id(&target).await.unwrap();

                let all = store.list_all().await.unwrap();
                assert_count(&all, 2);
                let ids: Vec<&InvoiceId> = all.iter().map(|s| &s.id).collect();
                assert!(ids.contains(&&keep_a));
                assert!(ids.contains(&&keep_b));
                assert!(!ids.contains(&&target));
                assert_eq!(sorted_numbers(&all), vec![Some(1), Some(3)]);
            }

            #[tokio::test]
            async fn test_delete_absent_is_ok() {
                let store = $factory;
                store.insert(sample_invoice(1)).await.unwrap();
                let gone = store.insert(sample_invoice(2)).await.unwrap();
                store.delete_by_id(&gone).await.unwrap();

                // Well-formed identifier, no longer present
                store.delete_by_id(&gone).await.unwrap();

                let all = store.list_all().await.unwrap();
                assert_count(&all, 1);
                assert_eq!(all[0].invoice.invoice_number, Some(1));
            }

            #[tokio::test]
            async fn test_delete_malformed_id_fails() {
                let store = $factory;
                store.insert(sample_invoice(1)).await.unwrap();

                let err = store
                    .delete_by_id(&InvoiceId::new("definitely-not-an-id"))
                    .await
                    .unwrap_err();

                assert!(matches!(err, StoreError::Persistence { .. }));
                assert!(!err.to_string().is_empty());
                assert_count(&store.list_all().await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;

                let handles: Vec<_> = (1..=10)
                    .map(|n| {
                        let store = store.clone();
                        tokio::spawn(async move { store.insert(sample_invoice(n)).await })
                    })
                    .collect();

                tokio::time::timeout(std::time::Duration::from_secs(30), async {
                    for handle in handles {
                        handle.await.unwrap().unwrap();
                    }
                })
                .await
                .expect("Concurrent inserts timed out after 30s");

                let all = store.list_all().await.unwrap();
                assert_count(&all, 10);
                assert_eq!(
                    sorted_numbers(&all),
                    (1..=10).map(Some).collect::<Vec<_>>()
                );
            }
        }
    };
}
