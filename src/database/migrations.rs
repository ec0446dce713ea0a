use log::info;
use tokio_postgres::Client;

// Creates the tables and indexes used by the messaging subsystem.
// Every statement is idempotent so this runs on each startup.
pub async fn apply_migrations(client: &Client) -> Result<(), String> {
    create_tables(client).await?;
    create_indexes(client).await?;

    info!("Migrations applied");
    Ok(())
}

async fn create_tables(client: &Client) -> Result<(), String> {
    // The user directory is owned by the account service; this is the subset read here.
    let create_users_table_query = "
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            username VARCHAR(255) NOT NULL UNIQUE,
            avatar TEXT
        )
    ";
    client
        .execute(create_users_table_query, &[])
        .await
        .map_err(|e| format!("Error creating users table: {}", e))?;

    // sender_id / receiver_id may outlive the users they reference
    let create_messages_table_query = "
        CREATE TABLE IF NOT EXISTS messages (
            id BIGSERIAL PRIMARY KEY,
            sender_id BIGINT NOT NULL,
            receiver_id BIGINT NOT NULL,
            content TEXT NOT NULL,
            is_read BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
    ";
    client
        .execute(create_messages_table_query, &[])
        .await
        .map_err(|e| format!("Error creating messages table: {}", e))?;

    Ok(())
}

async fn create_indexes(client: &Client) -> Result<(), String> {
    let indexes = [
        // history and latest message between a pair
        "CREATE INDEX IF NOT EXISTS idx_messages_pair_created
            ON messages (sender_id, receiver_id, created_at)",
        // counterpart discovery from the receiving side
        "CREATE INDEX IF NOT EXISTS idx_messages_receiver
            ON messages (receiver_id, sender_id)",
        "CREATE INDEX IF NOT EXISTS idx_messages_unread
            ON messages (receiver_id, sender_id) WHERE is_read = FALSE",
    ];

    for query in indexes {
        client
            .execute(query, &[])
            .await
            .map_err(|e| format!("Error creating index: {}", e))?;
    }

    Ok(())
}
