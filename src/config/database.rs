use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, Statement,
};
use tracing::info;

use crate::domain::{
    defender::entity::{defender, defender_stats},
    game::entity::{activity, available_defender, game, offensive_player},
    line::entity::{defensive_line, defensive_line_defender},
    lineup::entity::{current_point_defender, selected_defender},
    point::entity::{matchup, point, point_defender},
    team::entity::{team, team_member},
    user::entity::user,
};

pub async fn establish_connection(
    database_url: &str,
    schema_update: bool,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options
        .connect_timeout(Duration::from_secs(8))
        .sqlx_logging(false);
    // In-memory SQLite는 커넥션마다 별도 DB가 되므로 단일 커넥션으로 고정
    if database_url.starts_with("sqlite::memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Successfully connected to the database.");

    if schema_update {
        create_tables(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

/// 엔티티로부터 테이블과 복합 unique 인덱스를 생성합니다.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    // Order matters for foreign keys! (Parent first, then Child)

    // 1. Independent Entities
    create_table_if_not_exists(db, &schema, user::Entity).await?;
    create_table_if_not_exists(db, &schema, team::Entity).await?;

    // 2. Team children
    create_table_if_not_exists(db, &schema, team_member::Entity).await?;
    create_table_if_not_exists(db, &schema, defender::Entity).await?;
    create_table_if_not_exists(db, &schema, game::Entity).await?;
    create_table_if_not_exists(db, &schema, defensive_line::Entity).await?;

    // 3. Game children
    create_table_if_not_exists(db, &schema, offensive_player::Entity).await?;
    create_table_if_not_exists(db, &schema, available_defender::Entity).await?;
    create_table_if_not_exists(db, &schema, activity::Entity).await?;
    create_table_if_not_exists(db, &schema, point::Entity).await?;
    create_table_if_not_exists(db, &schema, defender_stats::Entity).await?;
    create_table_if_not_exists(db, &schema, selected_defender::Entity).await?;
    create_table_if_not_exists(db, &schema, current_point_defender::Entity).await?;
    create_table_if_not_exists(db, &schema, defensive_line_defender::Entity).await?;

    // 4. Point children
    create_table_if_not_exists(db, &schema, point_defender::Entity).await?;
    create_table_if_not_exists(db, &schema, matchup::Entity).await?;

    let unique_indexes: [(&str, &str, &[&str]); 7] = [
        ("uq_team_member_user_team", "team_member", &["user_id", "team_id"]),
        ("uq_defender_stats_defender_game", "defender_stats", &["defender_id", "game_id"]),
        ("uq_selected_defender_game_defender", "selected_defender", &["game_id", "defender_id"]),
        (
            "uq_current_point_defender_game_player",
            "current_point_defender",
            &["game_id", "offensive_player_id"],
        ),
        ("uq_available_defender_game_defender", "available_defender", &["game_id", "defender_id"]),
        ("uq_point_defender_point_defender", "point_defender", &["point_id", "defender_id"]),
        ("uq_point_game_client_key", "point", &["game_id", "client_key"]),
    ];
    for (name, table, columns) in unique_indexes {
        create_index_if_not_exists(db, name, table, columns, true).await?;
    }
    create_index_if_not_exists(db, "idx_point_game_number", "point", &["game_id", "point_number"], false)
        .await?;
    create_index_if_not_exists(db, "idx_activity_game_created", "activity", &["game_id", "created_at"], false)
        .await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
    unique: bool,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let cols = columns.join(", ");
    let kind = if unique { "UNIQUE INDEX" } else { "INDEX" };
    let sql = format!("CREATE {} {} ON {} ({})", kind, index_name, table_name, cols);
    let stmt = Statement::from_string(backend, sql);
    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            // Ignore duplicate index errors for idempotency.
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("duplicate") || err_str.contains("already exists") {
                Ok(())
            } else {
                tracing::error!("Failed to create index {}: {}", index_name, e);
                Err(e)
            }
        }
    }
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    db.execute(create_stmt).await.map(|_| ()).map_err(|e| {
        tracing::error!("Failed to create table {}: {}", entity.table_name(), e);
        e
    })
}
