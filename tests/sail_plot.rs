use assert_cmd::Command;
use std::fs::{self, File};
use std::io::Write;

#[test]
fn sail_plot_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("traj.csv");
    let png_path = dir.path().join("plots").join("traj.png");

    let mut file = File::create(&csv_path).expect("csv create");
    writeln!(file, "segment,time,r,theta,v_r,v_t,x,y,angle_deg").unwrap();
    for segment in 0..2 {
        for i in 0..20 {
            let theta = (segment * 20 + i) as f64 * 0.1;
            let r = 1.0 + 0.01 * theta;
            writeln!(
                file,
                "{segment},{theta},{r},{theta},0.0,1.0,{},{},0.0",
                r * theta.cos(),
                r * theta.sin()
            )
            .unwrap();
        }
    }
    drop(file);

    Command::cargo_bin("sail_plot")
        .expect("sail_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--width",
            "300",
            "--height",
            "300",
            "--no-annotations",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn sail_plot_rejects_empty_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("empty.csv");
    fs::write(&csv_path, "segment,time,r,theta,v_r,v_t,x,y,angle_deg\n").expect("write csv");

    Command::cargo_bin("sail_plot")
        .expect("sail_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            dir.path().join("none.png").to_str().unwrap(),
        ])
        .assert()
        .failure();
}
