use refchain::command::{
    ExtractCommand, JoinCommand, RegexMatchCommand, SplitCommand, TokenReplaceCommand,
};
use refchain::context::{InMemoryContext, WorkflowContext};
use refchain::error::FlowError;
use refchain::reference::decorator::{file_name, token};
use serde_json::json;

#[tokio::test]
async fn greeting_template_is_filled_from_tokens() {
    let mut ctx = InMemoryContext::new();
    ctx.store(json!("World"), vec![token("name")]).await.unwrap();
    ctx.store(json!("Hello {{name}}!"), vec![token("template")])
        .await
        .unwrap();

    let cmd = TokenReplaceCommand::new("template", Some("greeting".to_string()));
    let refs = ctx.run(&cmd, None).await.unwrap();

    assert_eq!(ctx.token("greeting"), Some(&json!("Hello World!")));
    let lineage = &refs[0].metadata;
    assert_eq!(lineage.len(), 1);
    assert_eq!(lineage[0].transform_type, "TokenReplace");
    assert_eq!(lineage[0].inputs, vec!["template".to_string()]);
}

#[tokio::test]
async fn price_is_extracted_from_capture_group() {
    let mut ctx = InMemoryContext::new();
    ctx.store(json!("Total: $42.99"), vec![token("receipt")])
        .await
        .unwrap();

    let cmd = ExtractCommand::new("receipt", r"\$([0-9.]+)", Some("price".to_string())).unwrap();
    ctx.run(&cmd, None).await.unwrap();

    assert_eq!(ctx.token("price"), Some(&json!("42.99")));
    let stored = ctx.lookup("price").unwrap();
    assert_eq!(stored.metadata[0].params["pattern"], json!(r"\$([0-9.]+)"));
}

#[tokio::test]
async fn missing_input_token_fails_without_storing() {
    let mut ctx = InMemoryContext::new();
    let cmd = TokenReplaceCommand::new("nope", Some("out".to_string()));

    let err = ctx.run(&cmd, None).await.unwrap_err();

    assert!(matches!(err, FlowError::MissingToken { token: ref name } if name == "nope"));
    assert!(ctx.index().is_empty());
}

#[tokio::test]
async fn regex_match_without_match_is_error() {
    let mut ctx = InMemoryContext::new();
    ctx.store(json!("no digits here"), vec![token("t")])
        .await
        .unwrap();
    let cmd = RegexMatchCommand::new("t", r"\d+", None).unwrap();

    let err = ctx.run(&cmd, None).await.unwrap_err();
    assert!(matches!(err, FlowError::NoMatch { .. }));
}

#[tokio::test]
async fn chained_transforms_each_record_one_lineage_entry() {
    let mut ctx = InMemoryContext::new();
    ctx.store(json!("red,green,blue"), vec![token("colors")])
        .await
        .unwrap();

    ctx.run(&SplitCommand::new("colors", ",", Some("c".to_string())), None)
        .await
        .unwrap();
    let joined = ctx
        .run(
            &JoinCommand::new(
                vec!["c-3".to_string(), "c-1".to_string()],
                " & ",
                Some("pair".to_string()),
            ),
            None,
        )
        .await
        .unwrap();

    assert_eq!(ctx.token("pair"), Some(&json!("blue & red")));
    assert_eq!(joined[0].metadata.len(), 1);
    assert_eq!(joined[0].metadata[0].transform_type, "Join");
    assert_eq!(
        joined[0].metadata[0].inputs,
        vec!["c-3".to_string(), "c-1".to_string()]
    );
}

#[tokio::test]
async fn later_store_under_same_token_wins_but_old_ref_stays_addressable() {
    let mut ctx = InMemoryContext::new();
    let first = ctx.store(json!("v1"), vec![token("doc")]).await.unwrap();
    let second = ctx
        .store(json!("v2"), vec![token("doc"), file_name("doc.txt")])
        .await
        .unwrap();

    assert_eq!(ctx.token("doc"), Some(&json!("v2")));
    assert_eq!(ctx.get(&first.id).unwrap().content, json!("v1"));
    assert_eq!(ctx.lookup(&second.id).unwrap().file_name.as_deref(), Some("doc.txt"));
}
