use std::fs;

use backtest_chart::{
    config::{ChartConfig, load_config_path},
    models::chart::AxisScale,
    pipeline::Pipeline,
    render::to_json,
};

#[tokio::test]
async fn renders_from_an_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    fs::create_dir(&out).unwrap();
    fs::write(out.join("pairname.txt"), "ETHUSDT\n").unwrap();
    fs::write(out.join("equity.txt"), "512.25\n").unwrap();
    fs::write(out.join("asset.txt"), "10,200\n\n20,250\nbad,row\n").unwrap();
    fs::write(out.join("trades.txt"), "20,sell,exit\n").unwrap();
    fs::write(out.join("fit.txt"), "10,5\n20,25\n").unwrap();

    let config_path = dir.path().join("chart.toml");
    fs::write(
        &config_path,
        format!(
            r#"
base = {base:?}
max_rendered_trades = 10

[trades]
min_columns = 3

[[overlays]]
id = "fit"
color = "orange"
axis = "secondary"
"#,
            base = out.display().to_string()
        ),
    )
    .unwrap();

    let config = load_config_path(&config_path).unwrap();
    assert_eq!(config.overlays[0].path, "fit.txt");

    let output = Pipeline::from_config(config)
        .unwrap()
        .run(AxisScale::Linear)
        .await
        .unwrap();

    assert_eq!(output.title.document_title(), "ETHUSDT -- $512.25");
    assert_eq!(output.alignment.groups.sells.len(), 1);
    assert_eq!(output.alignment.groups.sells[0].value, 250.0);

    let json: serde_json::Value = serde_json::from_str(&to_json(&output.chart).unwrap()).unwrap();
    let traces = json["traces"].as_array().unwrap();
    assert_eq!(traces.len(), 5);
    assert_eq!(traces[4]["name"], "fit");
    assert_eq!(traces[4]["yaxis"], "y2");
    assert_eq!(traces[4]["line"]["color"], "orange");
    assert_eq!(traces[0]["x"][0], "1970-01-01 00:00:10.000");
}

#[tokio::test]
async fn corrupt_bytes_only_cost_their_row() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("pairname.txt"), "BTCUSDT").unwrap();
    fs::write(dir.path().join("equity.txt"), "1000.00").unwrap();
    fs::write(dir.path().join("asset.txt"), b"1,100\n\xff,200\n2,110\n").unwrap();

    let mut config = ChartConfig::default();
    config.base = dir.path().display().to_string();
    config.overlays.clear();

    let output = Pipeline::from_config(config)
        .unwrap()
        .run(AxisScale::Linear)
        .await
        .unwrap();

    assert_eq!(output.chart.traces[0].y, vec![100.0, 110.0]);
}

#[test]
fn missing_config_file_names_the_path() {
    let err = load_config_path("/definitely/not/here/chart.toml").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here/chart.toml"));
}
