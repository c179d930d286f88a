//! Basic example demonstrating the ant bindings.
//!
//! Run with: ANT_FFI_LIBRARY=/path/to/libant_ffi.so cargo run --example basic
//!
//! Set ANT_LOCAL_NETWORK=1 and SECRET_KEY to also upload to a local testnet.

use std::time::Duration;

use ant::{CancelToken, Chunk, Client, Library, Network, PaymentOption, Wallet};

fn main() -> ant::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let lib = Library::from_env()?;
    println!("Loaded: {:?}", lib);

    println!("\n--- Self-encryption ---");
    let data = b"Hello, World!";
    let encrypted = ant::self_encryption::encrypt(&lib, data)?;
    println!("Encrypted {} bytes into {} bytes", data.len(), encrypted.size());
    let decrypted = ant::self_encryption::decrypt(&lib, &encrypted)?;
    println!("Decrypted: {}", String::from_utf8_lossy(&decrypted));

    println!("\n--- Chunks ---");
    println!("Max chunk size: {} bytes", ant::data::chunk_max_size(&lib)?);
    println!("Max raw chunk size: {} bytes", ant::data::chunk_max_raw_size(&lib)?);
    let chunk = Chunk::new(&lib, b"a small chunk")?;
    println!("Chunk size: {}", chunk.size()?);
    println!("Chunk address: {}", chunk.address()?.to_hex()?);
    println!("Network address: {}", chunk.network_address()?);

    if std::env::var("ANT_LOCAL_NETWORK").map(|v| v == "1").unwrap_or(false) {
        let secret_key = match std::env::var("SECRET_KEY") {
            Ok(key) => key,
            Err(_) => {
                println!("\nSECRET_KEY not set - skipping network example");
                return Ok(());
            }
        };

        println!("\n--- Local network ---");
        let cancel = CancelToken::with_timeout(Duration::from_secs(120));
        let network = Network::new(&lib, true)?;
        let wallet = Wallet::from_private_key(&network, &secret_key)?;
        println!("Wallet: {}", wallet.address()?);
        println!("Balance: {}", wallet.balance_of_tokens(Some(&cancel))?);

        let client = Client::init_local(&lib, Some(&cancel))?;
        let result = client.data_put_public(
            b"Hello, network!",
            Some(PaymentOption::Wallet(&wallet)),
            Some(&cancel),
        )?;
        println!("Stored at {} for {}", result.address, result.price);

        let fetched = client.data_get_public(&result.address, Some(&cancel))?;
        println!("Fetched: {}", String::from_utf8_lossy(&fetched));
    } else {
        println!("\nANT_LOCAL_NETWORK not set - skipping network example");
    }

    Ok(())
}
