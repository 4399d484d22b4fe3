use crate::domain::text::search_document;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, Statement};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Rfqs {
    Table,
    SearchText,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if !manager.has_column("rfqs", "search_text").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Rfqs::Table)
                        .add_column(
                            ColumnDef::new(Rfqs::SearchText)
                                .text()
                                .not_null()
                                .default(""),
                        )
                        .to_owned(),
                )
                .await?;
        }

        // Folding happens in Rust; SQLite lower() is ASCII only.
        let conn = manager.get_connection();
        let backend = manager.get_database_backend();
        let rows = conn
            .query_all(Statement::from_string(
                backend,
                "SELECT id, title, description FROM rfqs WHERE search_text = ''",
            ))
            .await?;

        for row in rows {
            let id: i32 = row.try_get("", "id")?;
            let title: String = row.try_get("", "title")?;
            let description: String = row.try_get("", "description")?;

            conn.execute(Statement::from_sql_and_values(
                backend,
                "UPDATE rfqs SET search_text = ? WHERE id = ?",
                [search_document(&title, &description).into(), id.into()],
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Rfqs::Table)
                    .drop_column(Rfqs::SearchText)
                    .to_owned(),
            )
            .await
    }
}
