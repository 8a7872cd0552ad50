use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("embedded_credentials.rs");

    let igdb_key = env::var("ROMDEX_IGDB_APIKEY").ok();
    let ss_dev_id = env::var("ROMDEX_SS_DEVID").ok();
    let ss_dev_password = env::var("ROMDEX_SS_DEVPASSWORD").ok();

    let key: &[u8] = b"romdex-obfuscation-4e81d2a6";

    let mut code = String::new();
    code.push_str(&format!(
        "const OBFUSCATION_KEY: &[u8] = &{:?};\n\n",
        key
    ));

    emit_optional(&mut code, "EMBEDDED_IGDB_API_KEY", igdb_key.as_deref(), key);

    // ScreenScraper needs the pair; embed only if BOTH are provided
    match (&ss_dev_id, &ss_dev_password) {
        (Some(id), Some(pw)) => {
            emit_optional(&mut code, "EMBEDDED_SS_DEV_ID", Some(id), key);
            emit_optional(&mut code, "EMBEDDED_SS_DEV_PASSWORD", Some(pw), key);
        }
        _ => {
            emit_optional(&mut code, "EMBEDDED_SS_DEV_ID", None, key);
            emit_optional(&mut code, "EMBEDDED_SS_DEV_PASSWORD", None, key);
        }
    }

    fs::write(&dest_path, code).unwrap();

    println!("cargo:rerun-if-env-changed=ROMDEX_IGDB_APIKEY");
    println!("cargo:rerun-if-env-changed=ROMDEX_SS_DEVID");
    println!("cargo:rerun-if-env-changed=ROMDEX_SS_DEVPASSWORD");
}

fn emit_optional(code: &mut String, name: &str, value: Option<&str>, key: &[u8]) {
    match value {
        Some(value) => {
            let encoded = xor_encode(value.as_bytes(), key);
            code.push_str(&format!(
                "const {}: Option<&[u8]> = Some(&{:?});\n",
                name,
                encoded.as_slice()
            ));
        }
        None => {
            code.push_str(&format!("const {}: Option<&[u8]> = None;\n", name));
        }
    }
}

fn xor_encode(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, b)| b ^ key[i % key.len()])
        .collect()
}
