use photostore_blobs::prelude::*;

// Prints what the photo page would display for a container.
#[tokio::main]
async fn main() -> photostore_core::Result<()> {
    env_logger::init();

    let connection_string = std::env::var("STORAGE_CONNECTION_STRING")
        .expect("Set env variable STORAGE_CONNECTION_STRING first!");
    let container = std::env::args()
        .nth(1)
        .expect("please specify the container name as command line parameter");

    let client = BlobServiceClientBuilder::from_connection_string(&connection_string)?.build()?;
    let response = client
        .fetch_all(&container, BlobKind::BlockBlob)
        .into_future()
        .await?;
    if let Some(failure) = &response.failure {
        eprintln!("listing stopped early: {failure}");
    }

    let photo = PhotoModel::from_items(&response.blobs);
    match (photo.title, photo.uri) {
        (Some(title), Some(uri)) => println!("{title}\n{uri}"),
        _ => println!("no photos in {container}"),
    }

    Ok(())
}
