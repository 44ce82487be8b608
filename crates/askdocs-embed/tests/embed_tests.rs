use askdocs_core::config::EmbedConfig;
use askdocs_core::traits::Embedder;
use askdocs_embed::get_default_embedder;

#[test]
fn fake_embedder_shapes_and_determinism() {
    // Force fake embedder to avoid loading the model
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder(&EmbedConfig::default()).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");

    assert_eq!(embs.len(), 2, "one vector per input, order preserved");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), embedder.dim(), "embedding dim matches dim()");

    // Norm approximately 1.0
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Deterministic for same input
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn fake_embedder_separates_disjoint_vocabulary() {
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder(&EmbedConfig::default()).expect("embedder");
    let texts = vec![
        "solar panel wiring voltage regulator".to_string(),
        "solar panel wiring voltage".to_string(),
        "goat cheese fermentation recipe".to_string(),
    ];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");

    let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
    let near = dot(&embs[0], &embs[1]);
    let far = dot(&embs[0], &embs[2]);
    assert!(
        near > far,
        "shared vocabulary ranks closer (near={near}, far={far})"
    );
}
