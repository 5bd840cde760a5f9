//! Data export archive and SQL backup, written to disk before download.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use sea_orm::*;
use serde::Serialize;
use tokio::fs;
use tracing::info;
use uuid::Uuid;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::entity::{ad_event, ad_platform, caption, user};

pub const EXPORT_FILE: &str = "user_data_export.zip";
pub const BACKUP_FILE: &str = "backup.sql";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("archive creation failed: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// A file just written to the exports directory, opened for download.
///
/// The handle refers to this run's bytes even after a later run replaces `path`.
#[derive(Debug)]
pub struct Published {
    pub path: PathBuf,
    pub file: fs::File,
}

/// Write `bytes` under a private name, open it, then move it over `dir/name`.
async fn publish(dir: &Path, name: &str, bytes: &[u8]) -> Result<Published, ExportError> {
    fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    let staging = dir.join(format!(".{name}.{}", Uuid::new_v4().simple()));

    fs::write(&staging, bytes).await?;
    let file = fs::File::open(&staging).await?;
    if let Err(e) = fs::rename(&staging, &path).await {
        let _ = fs::remove_file(&staging).await;
        return Err(e.into());
    }
    Ok(Published { path, file })
}

#[derive(Serialize)]
struct UserRow<'a> {
    id: i32,
    device_id: &'a str,
    created_at: String,
    last_active: Option<String>,
    caption_count: i32,
    ad_watched: i32,
    coins: i32,
}

impl<'a> From<&'a user::Model> for UserRow<'a> {
    fn from(m: &'a user::Model) -> Self {
        Self {
            id: m.id,
            device_id: &m.device_id,
            created_at: m.created_at.to_rfc3339(),
            last_active: m.last_active.map(|t| t.to_rfc3339()),
            caption_count: m.caption_count,
            ad_watched: m.ad_watched,
            coins: m.coins,
        }
    }
}

#[derive(Serialize)]
struct CaptionRow<'a> {
    id: i32,
    user_id: i32,
    image_hash: &'a str,
    caption: &'a str,
    hashtags: &'a str,
    style: &'a str,
    created_at: String,
}

impl<'a> From<&'a caption::Model> for CaptionRow<'a> {
    fn from(m: &'a caption::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            image_hash: &m.image_hash,
            caption: &m.caption,
            hashtags: &m.hashtags,
            style: &m.style,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

fn to_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Build `users.csv` and `captions.csv` into a zip archive.
pub fn build_archive(
    users: &[user::Model],
    captions: &[caption::Model],
) -> Result<Vec<u8>, ExportError> {
    let users_csv = to_csv(users.iter().map(UserRow::from))?;
    let captions_csv = to_csv(captions.iter().map(CaptionRow::from))?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut archive = zip::ZipWriter::new(Cursor::new(Vec::new()));
    archive.start_file("users.csv", options)?;
    archive.write_all(&users_csv)?;
    archive.start_file("captions.csv", options)?;
    archive.write_all(&captions_csv)?;

    Ok(archive.finish()?.into_inner())
}

/// Export every user and caption to `dir/user_data_export.zip`.
pub async fn export_user_data(
    db: &DatabaseConnection,
    dir: &Path,
) -> Result<Published, ExportError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;
    let captions = caption::Entity::find()
        .order_by_asc(caption::Column::Id)
        .all(db)
        .await?;

    let bytes = build_archive(&users, &captions)?;
    let published = publish(dir, EXPORT_FILE, &bytes).await?;

    info!(
        users = users.len(),
        captions = captions.len(),
        path = %published.path.display(),
        "User data exported"
    );
    Ok(published)
}

fn create_table_sql<E: EntityTrait>(schema: &Schema, entity: E) -> String {
    let stmt = DbBackend::Sqlite.build(&schema.create_table_from_entity(entity));
    format!("{stmt};")
}

fn insert_sql<A>(models: Vec<<A::Entity as EntityTrait>::Model>) -> Vec<String>
where
    A: ActiveModelTrait + From<<A::Entity as EntityTrait>::Model>,
{
    models
        .into_iter()
        .map(|m| {
            let stmt = <A::Entity as EntityTrait>::insert(A::from(m)).build(DbBackend::Sqlite);
            format!("{stmt};")
        })
        .collect()
}

/// Dump schema and rows of every table as replayable SQL.
pub async fn dump_sql(db: &DatabaseConnection) -> Result<String, ExportError> {
    let schema = Schema::new(DbBackend::Sqlite);

    let mut lines = vec!["BEGIN TRANSACTION;".to_string()];
    lines.push(create_table_sql(&schema, user::Entity));
    lines.push(create_table_sql(&schema, ad_platform::Entity));
    lines.push(create_table_sql(&schema, ad_event::Entity));
    lines.push(create_table_sql(&schema, caption::Entity));

    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;
    lines.extend(insert_sql::<user::ActiveModel>(users));

    let platforms = ad_platform::Entity::find()
        .order_by_asc(ad_platform::Column::Id)
        .all(db)
        .await?;
    lines.extend(insert_sql::<ad_platform::ActiveModel>(platforms));

    let events = ad_event::Entity::find()
        .order_by_asc(ad_event::Column::Id)
        .all(db)
        .await?;
    lines.extend(insert_sql::<ad_event::ActiveModel>(events));

    let captions = caption::Entity::find()
        .order_by_asc(caption::Column::Id)
        .all(db)
        .await?;
    lines.extend(insert_sql::<caption::ActiveModel>(captions));

    lines.push("COMMIT;".to_string());

    let mut dump = lines.join("\n");
    dump.push('\n');
    Ok(dump)
}

/// Write a full SQL backup to `dir/backup.sql`.
pub async fn backup_database(
    db: &DatabaseConnection,
    dir: &Path,
) -> Result<Published, ExportError> {
    let dump = dump_sql(db).await?;
    let published = publish(dir, BACKUP_FILE, dump.as_bytes()).await?;

    info!(path = %published.path.display(), "Database backup written");
    Ok(published)
}
