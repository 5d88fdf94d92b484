use proptest::prelude::*;
use refchain::command::{JoinCommand, SplitCommand};
use refchain::context::{InMemoryContext, WorkflowContext};
use refchain::reference::decorator::token;
use serde_json::json;
use std::collections::HashSet;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #[test]
    fn ids_are_unique(values in prop::collection::vec(".*", 1..40)) {
        let ids = block_on(async {
            let mut ctx = InMemoryContext::new();
            let mut ids = Vec::new();
            for value in &values {
                let stored = ctx.store(json!(value), vec![token("same")]).await.unwrap();
                ids.push(stored.id);
            }
            ids
        });
        let unique: HashSet<_> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn last_store_wins(values in prop::collection::vec("[a-z]{0,8}", 1..20)) {
        let latest = block_on(async {
            let mut ctx = InMemoryContext::new();
            for value in &values {
                ctx.store(json!(value), vec![token("k")]).await.unwrap();
            }
            ctx.token("k").cloned()
        });
        prop_assert_eq!(latest, values.last().map(|v| json!(v)));
    }

    #[test]
    fn split_then_join_restores_text(parts in prop::collection::vec("[a-z0-9 ]{0,6}", 1..8)) {
        let text = parts.join(",");
        let restored = block_on(async {
            let mut ctx = InMemoryContext::new();
            ctx.store(json!(text), vec![token("src")]).await.unwrap();
            let pieces = ctx
                .run(&SplitCommand::new("src", ",", Some("p".to_string())), None)
                .await
                .unwrap();
            let tokens = (1..=pieces.len()).map(|i| format!("p-{}", i)).collect();
            ctx.run(&JoinCommand::new(tokens, ",", Some("out".to_string())), None)
                .await
                .unwrap();
            ctx.token("out").cloned()
        });
        prop_assert_eq!(restored, Some(json!(text)));
    }
}
