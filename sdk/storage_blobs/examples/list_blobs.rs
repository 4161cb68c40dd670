use futures::StreamExt;
use photostore_blobs::prelude::*;
use std::num::NonZeroU32;

// Walks a container one level at a time, the way a file browser would.
#[tokio::main]
async fn main() -> photostore_core::Result<()> {
    env_logger::init();

    let connection_string = std::env::var("STORAGE_CONNECTION_STRING")
        .expect("Set env variable STORAGE_CONNECTION_STRING first!");
    let mut args = std::env::args().skip(1);
    let container = args
        .next()
        .expect("please specify the container name as command line parameter");
    let prefix = args.next().unwrap_or_default();

    let client = BlobServiceClientBuilder::from_connection_string(&connection_string)?.build()?;
    let mut stream = client
        .container_client(container)
        .list_blobs()
        .prefix(prefix)
        .delimiter("/")
        .max_results(NonZeroU32::new(100).unwrap())
        .into_stream();

    let mut page_number = 0;
    while let Some(page) = stream.next().await {
        let page = page?;
        page_number += 1;
        println!(
            "page {page_number}, request id {}",
            page.common.request_id.as_deref().unwrap_or("-")
        );
        for item in page.blobs {
            match item {
                BlobItem::Blob(blob) => println!(
                    "\t{} ({}, {} bytes)",
                    blob.name, blob.properties.blob_type, blob.properties.content_length
                ),
                BlobItem::BlobPrefix(prefix) => println!("\t{}", prefix.name),
            }
        }
    }

    Ok(())
}
