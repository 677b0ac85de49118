use serde_json::Value;
use std::process::Command;

const USER_KEY: &str = "16/DxkhBCdKkCBOEXsWonMeEM/g8E+IjFZx6EUMlCng=";
const USER_ADDRESS: &str = "0xe7adfa0df2a0ab8892ebcf2950050bd6906789c709f1defcca2e3b4b120529de";

// ten zero bytes
const PAYLOAD_B64: &str = "AAAAAAAAAAAAAA==";

fn run_cli(args: &[&str]) -> std::process::Output {
    let binary_path = assert_cmd::cargo::cargo_bin!("sui-ptb");
    Command::new(binary_path)
        .args(args)
        .env_remove("SUI_USER_KEY")
        .env_remove("SUI_SPONSOR_KEY")
        .output()
        .expect("cli runs")
}

fn run_json(args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_cli(&full);
    assert!(output.status.success(), "cli exited unsuccessfully: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
    serde_json::from_str(&stdout).expect("stdout is valid json")
}

#[test]
fn address_matches_known_key() {
    let value = run_json(&["--user-key", USER_KEY, "address"]);
    assert_eq!(value["address"], USER_ADDRESS);
    assert_eq!(
        value["publicKey"],
        "c073155234faea05ed28098be408439f546cc0d488e53268dc0f7d728ea40b6a"
    );
    assert_eq!(value["scheme"], "ed25519");
}

#[test]
fn user_key_read_from_environment() {
    let binary_path = assert_cmd::cargo::cargo_bin!("sui-ptb");
    let output = Command::new(binary_path)
        .args(["address"])
        .env("SUI_USER_KEY", USER_KEY)
        .output()
        .expect("cli runs");
    assert!(output.status.success(), "cli exited unsuccessfully: {:?}", output);
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
    assert!(stdout.contains(USER_ADDRESS));
}

#[test]
fn sign_produces_flagged_blob() {
    let value = run_json(&["--user-key", USER_KEY, "sign", PAYLOAD_B64]);
    let signature = value["signature"].as_str().expect("signature string");

    use base64::Engine;
    let blob = base64::engine::general_purpose::STANDARD
        .decode(signature)
        .expect("base64 signature");
    assert_eq!(blob.len(), 97);
    assert_eq!(blob[0], 0);
    assert_eq!(
        hex::encode(&blob[65..]),
        "c073155234faea05ed28098be408439f546cc0d488e53268dc0f7d728ea40b6a"
    );

    let again = run_json(&["--user-key", USER_KEY, "sign", PAYLOAD_B64]);
    assert_eq!(again["signature"], value["signature"]);
}

#[test]
fn sign_honours_scheme_byte() {
    let value = run_json(&["--user-key", USER_KEY, "sign", "--scheme", "5", PAYLOAD_B64]);
    use base64::Engine;
    let blob = base64::engine::general_purpose::STANDARD
        .decode(value["signature"].as_str().expect("signature string"))
        .expect("base64 signature");
    assert_eq!(blob[0], 5);
}

#[test]
fn digest_is_base58_of_salted_hash() {
    let value = run_json(&["digest", PAYLOAD_B64]);
    let digest = value["digest"].as_str().expect("digest string");
    let decoded = bs58::decode(digest).into_vec().expect("base58");
    assert_eq!(decoded.len(), 32);

    let mut salted = b"TransactionData::".to_vec();
    salted.extend_from_slice(&[0u8; 10]);
    assert_eq!(decoded, sui_ptb::crypto::blake2b256(&salted));
}

#[test]
fn keygen_emits_bech32_key() {
    let value = run_json(&["keygen"]);
    let private_key = value["privateKey"].as_str().expect("private key");
    assert!(private_key.starts_with("suiprivkey1"));

    // the generated key loads back to the same address
    let reloaded = run_json(&["--user-key", private_key, "address"]);
    assert_eq!(reloaded["address"], value["address"]);
}

#[test]
fn missing_user_key_fails_with_config_error() {
    let output = run_cli(&["--json", "address"]);
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf8");
    let value: Value = serde_json::from_str(&stdout).expect("error is json");
    assert_eq!(value["error"]["code"], "config_error");
}

#[test]
fn remote_http_endpoint_rejected() {
    let output = run_cli(&[
        "--user-key",
        USER_KEY,
        "--rpc-url",
        "http://fullnode.example.com",
        "pay",
        USER_ADDRESS,
        "1000",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("stderr is utf8");
    assert_eq!(stderr.matches("HTTPS required").count(), 1, "stderr: {}", stderr);
}
