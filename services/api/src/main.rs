use hla_donor_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("hla-donor error: {err}");
        std::process::exit(1);
    }
}
