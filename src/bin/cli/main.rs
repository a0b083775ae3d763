use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use object_store_facade::{
    BucketName, ManagedStorageService, ObjectKey, StorageService, StoreConfiguration,
    create_minio_storage,
};
use tokio_util::io::ReaderStream;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "storage-cli")]
#[command(about = "CLI for an S3-compatible object store facade", long_about = None)]
struct Cli {
    /// Store host
    #[arg(long, env = "STORE_HOST", default_value = "localhost")]
    host: String,

    /// Store port
    #[arg(long, env = "STORE_PORT", default_value = "9000")]
    port: u16,

    /// Use TLS for the store connection
    #[arg(long, env = "STORE_USE_TLS", default_value = "false")]
    use_tls: bool,

    /// Access key
    #[arg(long, env = "STORE_ACCESS_KEY", default_value = "minioadmin")]
    access_key: String,

    /// Secret key
    #[arg(long, env = "STORE_SECRET_KEY", default_value = "minioadmin")]
    secret_key: String,

    /// Optional region
    #[arg(long, env = "STORE_REGION")]
    region: Option<String>,

    /// Bucket to operate on
    #[arg(short, long, env = "STORE_BUCKET")]
    bucket: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a file
    Put {
        /// Object key
        key: String,
        /// File path to upload
        file: String,
        /// Stream the file instead of buffering it up front
        #[arg(long)]
        stream: bool,
    },

    /// Download an object
    Get {
        /// Object key
        key: String,
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Download a byte range of an object
    Chunk {
        /// Object key
        key: String,
        /// Range start
        offset: u64,
        /// Range length
        length: u64,
    },

    /// List one page of the bucket's keys
    List {
        /// Page number (zero-based)
        #[arg(short, long, default_value = "0")]
        page: i64,
        /// Page size
        #[arg(short = 's', long, default_value = "20")]
        page_size: i64,
    },

    /// Issue a presigned GET URL
    Url {
        /// Object key
        key: String,
        /// Expiration in days (0 = store default)
        #[arg(short, long, default_value = "7")]
        days: i64,
    },

    /// Check whether an object exists
    Exists {
        /// Object key
        key: String,
    },

    /// Delete one object
    Delete {
        /// Object key
        key: String,
    },

    /// Delete every object under a prefix
    DeleteFolder {
        /// Key prefix (a trailing '/' is added if missing)
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = StoreConfiguration::new(
        cli.host,
        cli.port,
        cli.use_tls,
        cli.access_key,
        cli.secret_key,
        cli.region,
    )
    .context("invalid store configuration")?;

    let service = create_minio_storage(config).context("failed to initialise storage")?;
    let bucket = BucketName::new(cli.bucket).context("invalid bucket name")?;

    match cli.command {
        Commands::Put { key, file, stream } => {
            let key = ObjectKey::new(key)?;
            let stored = if stream {
                let file = tokio::fs::File::open(&file)
                    .await
                    .with_context(|| format!("failed to open {}", file))?;
                let reader = ReaderStream::new(file).boxed();
                service.upload_file_stream(&bucket, &key, reader).await?
            } else {
                let content = tokio::fs::read(&file)
                    .await
                    .with_context(|| format!("failed to read {}", file))?;
                service.upload_file(&bucket, &key, content.into()).await?
            };
            info!(key = %stored, "uploaded");
        }
        Commands::Get { key, output } => {
            let key = ObjectKey::new(key)?;
            let content = service.download_file(&bucket, &key).await?;
            let bytes = content.bytes().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &bytes)
                        .await
                        .with_context(|| format!("failed to write {}", path))?;
                    info!(bytes = bytes.len(), path = %path, "downloaded");
                }
                None => {
                    use tokio::io::AsyncWriteExt;
                    tokio::io::stdout().write_all(&bytes).await?;
                }
            }
        }
        Commands::Chunk {
            key,
            offset,
            length,
        } => {
            let key = ObjectKey::new(key)?;
            let content = service
                .download_chunked_file(&bucket, &key, offset, length)
                .await?;
            let bytes = content.bytes().await?;
            use tokio::io::AsyncWriteExt;
            tokio::io::stdout().write_all(&bytes).await?;
        }
        Commands::List { page, page_size } => {
            let keys = service.list_objects_by_page(&bucket, page, page_size).await?;
            for key in keys {
                println!("{}", key);
            }
        }
        Commands::Url { key, days } => {
            let key = ObjectKey::new(key)?;
            let url = service.get_document_url(&bucket, &key, days).await?;
            println!("{}", url);
        }
        Commands::Exists { key } => {
            let key = ObjectKey::new(key)?;
            let exists = service.file_exists(&bucket, &key).await?;
            println!("{}", exists);
        }
        Commands::Delete { key } => {
            let key = ObjectKey::new(key)?;
            service.delete_file(&bucket, &key).await?;
            info!(key = %key, "deleted");
        }
        Commands::DeleteFolder { prefix } => {
            service.delete_folder(&bucket, &prefix).await?;
            info!(prefix = %prefix, "folder deleted");
        }
    }

    Ok(())
}
