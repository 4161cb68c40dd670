use photostore_blobs::prelude::*;

#[tokio::main]
async fn main() -> photostore_core::Result<()> {
    env_logger::init();

    let connection_string = std::env::var("STORAGE_CONNECTION_STRING")
        .expect("Set env variable STORAGE_CONNECTION_STRING first!");
    let mut args = std::env::args().skip(1);
    let container = args
        .next()
        .expect("please specify the container name as first command line parameter");
    let path = args
        .next()
        .expect("please specify the file to upload as second command line parameter");
    let blob_name = args.next().unwrap_or_else(|| {
        std::path::Path::new(&path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone())
    });

    let payload = std::fs::read(&path)?;
    let client = BlobServiceClientBuilder::from_connection_string(&connection_string)?.build()?;
    let blob = client.upload_block(&container, payload, &blob_name).await?;

    println!(
        "uploaded {} byte(s) to {} (etag {})",
        blob.properties.content_length,
        blob.url,
        blob.properties.etag.as_deref().unwrap_or("-")
    );
    Ok(())
}
