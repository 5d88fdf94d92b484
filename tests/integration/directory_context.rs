use refchain::command::{ExtractCommand, TokenReplaceCommand};
use refchain::context::{DirectoryContext, WorkflowContext};
use refchain::reference::decorator::token;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn derived_file_carries_frontmatter_then_content() {
    let temp = TempDir::new().unwrap();
    let mut ctx = DirectoryContext::new(temp.path());
    ctx.store(json!("World"), vec![token("name")]).await.unwrap();
    ctx.store(json!("Hello {{name}}!"), vec![token("template")])
        .await
        .unwrap();

    let refs = ctx
        .run(
            &TokenReplaceCommand::new("template", Some("greeting".to_string())),
            None,
        )
        .await
        .unwrap();

    let path = ctx.path_for(&refs[0]).unwrap();
    let document = std::fs::read_to_string(path).unwrap();
    assert!(document.starts_with("---\ntransforms:\n  - type: TokenReplace\n"));
    assert!(document.contains("    inputs: [template]\n"));
    assert!(document.ends_with("---\n\nHello World!"));
}

#[tokio::test]
async fn frontmatter_parses_as_yaml() {
    let temp = TempDir::new().unwrap();
    let mut ctx = DirectoryContext::new(temp.path());
    ctx.store(json!("Total: $42.99"), vec![token("receipt")])
        .await
        .unwrap();
    let refs = ctx
        .run(
            &ExtractCommand::new("receipt", r"\$([0-9.]+)", Some("price".to_string())).unwrap(),
            None,
        )
        .await
        .unwrap();

    let document = std::fs::read_to_string(ctx.path_for(&refs[0]).unwrap()).unwrap();
    let header = document
        .strip_prefix("---\n")
        .and_then(|rest| rest.split("\n---\n").next())
        .unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(header).unwrap();
    let entry = &parsed["transforms"][0];
    assert_eq!(entry["type"].as_str(), Some("Extract"));
    assert_eq!(entry["params"]["pattern"].as_str(), Some(r"\$([0-9.]+)"));
}

#[tokio::test]
async fn plain_store_has_no_frontmatter() {
    let temp = TempDir::new().unwrap();
    let mut ctx = DirectoryContext::new(temp.path()).with_extension("md");
    let stored = ctx.store(json!("plain"), vec![token("note")]).await.unwrap();

    let name = stored.file_name.clone().unwrap();
    assert!(name.ends_with("-note.md"));
    let document = std::fs::read_to_string(temp.path().join(name)).unwrap();
    assert_eq!(document, "plain");
}

#[tokio::test]
async fn every_indexed_ref_has_a_file() {
    let temp = TempDir::new().unwrap();
    let mut ctx = DirectoryContext::new(temp.path());
    for i in 0..10 {
        ctx.store(json!(i), vec![token("n")]).await.unwrap();
    }

    assert_eq!(ctx.index().len(), 10);
    for reference in ctx.index().refs() {
        assert!(ctx.path_for(reference).unwrap().exists());
    }
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 10);
}
