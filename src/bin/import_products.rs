// Small ops utility: import a spreadsheet or run a search against the configured backend.
//
// Usage:
//   cargo run --bin import_products -- import <file>
//   cargo run --bin import_products -- search <code> [description]
//   cargo run --bin import_products -- count
//
// Backend and paths come from the same environment variables as the main binary.

use anyhow::{bail, Context};
use stock_lens::app::AppState;

fn usage() -> &'static str {
    "usage: import_products import <file> | search <code> [description] | count"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stock_lens::logging::init_from_env();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();

    let state = AppState::from_env().map_err(anyhow::Error::msg)?;
    let api = state.product_api.clone();

    match command.as_str() {
        "import" => {
            let file = args.next().context(usage())?;
            let response = api
                .import_file(&file)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            let summary = &response.summary;
            println!("batch_id={}", summary.batch_id);
            println!("file={}", summary.file_name);
            println!(
                "rows={} imported={} dropped={} duplicate_codes={} elapsed_ms={}",
                summary.total_rows,
                summary.imported,
                summary.dropped_rows,
                summary.duplicate_codes,
                summary.elapsed_ms
            );
            println!("total_in_store={}", response.total_in_store);
            println!("{}", response.notification.message);
        }
        "search" => {
            let code = args.next().unwrap_or_default();
            let description = args.next().unwrap_or_default();
            let response = api
                .search(&code, &description)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            for view in &response.products {
                let p = &view.product;
                let location = if p.has_location() { p.location.as_str() } else { "-" };
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    p.code, p.description, location, p.stock, view.stock_label
                );
            }
            if response.products.is_empty() {
                println!("{}", stock_lens::i18n::t("search.no_results"));
            }
            println!("total={} match_mode={:?}", response.total, response.match_mode);
        }
        "count" => {
            let total = api
                .count()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("backend={} count={}", api.backend_name(), total);
        }
        _ => bail!(usage()),
    }

    Ok(())
}
