use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Role};
use crate::features::investigations::dtos::{
    CreateInvestigationDto, InvestigationListItemDto, InvestigationResponseDto,
    ListInvestigationsQuery,
};
use crate::features::investigations::models::{
    accept_failure, check_declinable, complete_failure, request_not_found, InvestigationListRow,
    InvestigationRequest, InvestigationStatus,
};
use crate::shared::validation::parse_date;

const REQUEST_COLUMNS: &str = "ir.id, ir.client_id, ir.investigator_id, ir.title, \
     ir.description, ir.priority, ir.status, ir.budget, ir.deadline, ir.created_at, ir.updated_at";

const LIST_SELECT: &str = r#"
    SELECT
        ir.id, ir.client_id, ir.investigator_id, ir.title, ir.description,
        ir.priority, ir.status, ir.budget, ir.deadline, ir.created_at, ir.updated_at,
        c.first_name AS client_first_name,
        c.last_name AS client_last_name,
        i.first_name AS investigator_first_name,
        i.last_name AS investigator_last_name
    FROM investigation_requests ir
    LEFT JOIN users c ON c.id = ir.client_id
    LEFT JOIN users i ON i.id = ir.investigator_id
"#;

/// Load a request by id, optionally locking the row for the surrounding
/// transaction.
pub async fn fetch_request<'e, E>(
    executor: E,
    id: Uuid,
    for_update: bool,
) -> Result<Option<InvestigationRequest>>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        "SELECT {} FROM investigation_requests ir WHERE ir.id = $1{}",
        REQUEST_COLUMNS,
        if for_update { " FOR UPDATE" } else { "" }
    );

    sqlx::query_as::<_, InvestigationRequest>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load investigation request {}: {:?}", id, e);
            AppError::Database(e)
        })
}

/// Service for investigation requests and their lifecycle transitions
pub struct InvestigationService {
    pool: PgPool,
}

impl InvestigationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List requests visible to the caller's active role, newest first
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: ListInvestigationsQuery,
    ) -> Result<Vec<InvestigationListItemDto>> {
        let scope = match user.active_role {
            Some(Role::Client) => "ir.client_id = $1",
            Some(Role::Investigator) => {
                r#"(ir.investigator_id = $1 OR (
                    ir.investigator_id IS NULL AND NOT EXISTS (
                        SELECT 1 FROM declined_investigations d
                        WHERE d.investigation_id = ir.id AND d.investigator_id = $1
                    )
                ))"#
            }
            None => return Ok(Vec::new()),
        };

        let sql = format!(
            r#"
            {}
            WHERE {}
              AND ($2::investigation_status IS NULL OR ir.status = $2)
            ORDER BY ir.created_at DESC
            "#,
            LIST_SELECT, scope
        );

        let rows = sqlx::query_as::<_, InvestigationListRow>(&sql)
            .bind(user.id)
            .bind(query.status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list investigations for {}: {:?}", user.id, e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Submit a new request on behalf of a client
    pub async fn create(
        &self,
        client_id: Uuid,
        dto: CreateInvestigationDto,
    ) -> Result<InvestigationResponseDto> {
        let deadline = parse_date(&dto.deadline).ok_or_else(|| {
            AppError::Validation("Deadline must be in yyyy-mm-dd format".to_string())
        })?;
        let budget = dto.budget.amount().map(Decimal::from).ok_or_else(|| {
            AppError::Validation("Budget must be a positive number up to 99999999".to_string())
        })?;

        let query = format!(
            r#"
            INSERT INTO investigation_requests AS ir
                (client_id, title, description, priority, status, budget, deadline)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );

        let request = sqlx::query_as::<_, InvestigationRequest>(&query)
            .bind(client_id)
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(dto.priority)
            .bind(InvestigationStatus::Submitted)
            .bind(budget)
            .bind(deadline)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create investigation request: {:?}", e);
                AppError::Database(e)
            })?;

        tracing::info!(
            "Investigation request submitted: id={}, client={}",
            request.id,
            client_id
        );

        Ok(request.into())
    }

    pub async fn get_by_id(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<InvestigationListItemDto> {
        let sql = format!("{} WHERE ir.id = $1", LIST_SELECT);
        let row = sqlx::query_as::<_, InvestigationListRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(request_not_found)?;

        let declined = self.has_declined(id, user.id).await?;
        if !row.request.is_visible_to(user, declined) {
            return Err(request_not_found());
        }

        Ok(row.into())
    }

    async fn has_declined(&self, investigation_id: Uuid, investigator_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM declined_investigations
                WHERE investigation_id = $1 AND investigator_id = $2
            )
            "#,
        )
        .bind(investigation_id)
        .bind(investigator_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    /// Take an open request. The first investigator to commit wins.
    pub async fn accept(&self, id: Uuid, investigator_id: Uuid) -> Result<InvestigationResponseDto> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            UPDATE investigation_requests AS ir
            SET investigator_id = $2, status = 'pending', updated_at = NOW()
            WHERE ir.id = $1 AND ir.status = 'submitted' AND ir.investigator_id IS NULL
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );

        let updated = sqlx::query_as::<_, InvestigationRequest>(&query)
            .bind(id)
            .bind(investigator_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to accept investigation {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        let request = match updated {
            Some(request) => request,
            None => {
                let current = fetch_request(&mut *tx, id, false).await?;
                return Err(accept_failure(current.as_ref()));
            }
        };

        tx.commit().await?;

        tracing::info!(
            "Investigation accepted: id={}, investigator={}",
            id,
            investigator_id
        );

        Ok(request.into())
    }

    /// Mark an assigned, pending request as completed
    pub async fn complete(
        &self,
        id: Uuid,
        investigator_id: Uuid,
    ) -> Result<InvestigationResponseDto> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            UPDATE investigation_requests AS ir
            SET status = 'completed', updated_at = NOW()
            WHERE ir.id = $1 AND ir.investigator_id = $2 AND ir.status = 'pending'
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );

        let updated = sqlx::query_as::<_, InvestigationRequest>(&query)
            .bind(id)
            .bind(investigator_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to complete investigation {}: {:?}", id, e);
                AppError::Database(e)
            })?;

        let request = match updated {
            Some(request) => request,
            None => {
                let current = fetch_request(&mut *tx, id, false).await?;
                return Err(complete_failure(current.as_ref(), investigator_id));
            }
        };

        tx.commit().await?;

        tracing::info!(
            "Investigation completed: id={}, investigator={}",
            id,
            investigator_id
        );

        Ok(request.into())
    }

    /// Record that the investigator opts out of an open request
    pub async fn decline(&self, id: Uuid, investigator_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let current = fetch_request(&mut *tx, id, true).await?;
        check_declinable(current.as_ref())?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO declined_investigations (investigation_id, investigator_id)
            VALUES ($1, $2)
            ON CONFLICT (investigation_id, investigator_id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(investigator_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to decline investigation {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .rows_affected();

        if inserted == 0 {
            return Err(AppError::BadRequest(
                "You have already declined this investigation request.".to_string(),
            ));
        }

        tx.commit().await?;

        tracing::info!(
            "Investigation declined: id={}, investigator={}",
            id,
            investigator_id
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::investigations::dtos::BudgetInput;
    use crate::features::investigations::models::InvestigationPriority;
    use crate::shared::test_helpers::seed_user;

    fn new_request() -> CreateInvestigationDto {
        CreateInvestigationDto {
            title: "Asset search".to_string(),
            description: "Locate property held under the subject's name".to_string(),
            priority: InvestigationPriority::High,
            deadline: "2030-03-01".to_string(),
            budget: BudgetInput::Text("1500".to_string()),
        }
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_first_accept_wins(pool: PgPool) {
        let service = InvestigationService::new(pool.clone());
        let client = seed_user(&pool, vec![Role::Client]).await;
        let first = seed_user(&pool, vec![Role::Investigator]).await;
        let second = seed_user(&pool, vec![Role::Investigator]).await;

        let request = service.create(client.id, new_request()).await.unwrap();
        assert_eq!(request.status, InvestigationStatus::Submitted);
        assert_eq!(request.budget, Some(Decimal::from(1500)));

        let accepted = service.accept(request.id, first.id).await.unwrap();
        assert_eq!(accepted.status, InvestigationStatus::Pending);
        assert_eq!(accepted.investigator_id, Some(first.id));

        let err = service.accept(request.id, second.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let stored = fetch_request(&pool, request.id, false).await.unwrap().unwrap();
        assert_eq!(stored.investigator_id, Some(first.id));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_only_assignee_completes(pool: PgPool) {
        let service = InvestigationService::new(pool.clone());
        let client = seed_user(&pool, vec![Role::Client]).await;
        let assignee = seed_user(&pool, vec![Role::Investigator]).await;
        let other = seed_user(&pool, vec![Role::Investigator]).await;

        let request = service.create(client.id, new_request()).await.unwrap();
        service.accept(request.id, assignee.id).await.unwrap();

        let err = service.complete(request.id, other.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let completed = service.complete(request.id, assignee.id).await.unwrap();
        assert_eq!(completed.status, InvestigationStatus::Completed);

        let err = service.complete(request.id, assignee.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_declined_request_hidden_from_decliner(pool: PgPool) {
        let service = InvestigationService::new(pool.clone());
        let client = seed_user(&pool, vec![Role::Client]).await;
        let decliner = seed_user(&pool, vec![Role::Investigator]).await;
        let other = seed_user(&pool, vec![Role::Investigator]).await;

        let request = service.create(client.id, new_request()).await.unwrap();
        service.decline(request.id, decliner.id).await.unwrap();

        let listed = service
            .list(&decliner, ListInvestigationsQuery::default())
            .await
            .unwrap();
        assert!(listed.iter().all(|item| item.request.id != request.id));

        let listed = service
            .list(&other, ListInvestigationsQuery::default())
            .await
            .unwrap();
        assert!(listed.iter().any(|item| item.request.id == request.id));

        let err = service.decline(request.id, decliner.id).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
