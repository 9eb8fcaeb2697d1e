//! [`Query`] collection related to the multiple [`User`]s.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain,
    infra::{database, Database},
    read::user::list::{Filter, Page, Selector, TotalCount},
    Service,
};

use super::Query;

/// Queries total count of [`User`]s matching a [`Filter`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Count(pub Filter);

impl<Db> Query<Count> for Service<Db>
where
    Db: Database<
        Select<By<TotalCount, Filter>>,
        Ok = TotalCount,
        Err = Traced<database::Error>,
    >,
{
    type Ok = TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Count(filter): Count,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(By::<TotalCount, _>::new(filter)))
            .await
            .map_err(tracerr::wrap!())
    }
}

/// Queries a [`Page`] of [`User`]s.
#[derive(Clone, Debug)]
pub struct List(pub Selector);

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
            Select<By<TotalCount, Filter>>,
            Ok = TotalCount,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<domain::User>, Selector>>,
            Ok = Vec<domain::User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Page;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        List(selector): List,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let arguments = selector.arguments;

        let count = self
            .execute(Count(selector.filter.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let count = usize::from(count);

        let total_pages = arguments.total_pages(count);
        if !arguments.is_within(total_pages) {
            return Err(tracerr::new!(E::PageNotFound(arguments.page())));
        }

        let users = self
            .database()
            .execute(Select(By::<Vec<domain::User>, _>::new(selector)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tracing::info!(
            total_items = count,
            total_pages,
            per_page = arguments.per_page(),
            page = arguments.page(),
            "serving page",
        );

        Ok(Page::new(&arguments, users, total_pages))
    }
}

/// Error of [`List`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested page is beyond the last one.
    #[display("page {_0} not found")]
    PageNotFound(#[error(not(source))] usize),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::user::{Email, FullName, LogonName, NewUser},
        infra::Memory,
        read::user::list::{Arguments, Filter, Selector},
        Config, Query as _, Service,
    };

    use super::{ExecutionError, List};

    fn service(users: usize) -> Service<Memory> {
        let db = Memory::from_users((1..=users).map(|n| NewUser {
            logon_name: LogonName::new(format!("testuser{n}")).unwrap(),
            full_name: FullName::new(format!("Test User {n}")).unwrap(),
            email: Email::new("test@email.com").unwrap(),
        }))
        .unwrap();
        Service::new(Config::default(), db)
    }

    fn list(page: usize, per_page: usize, filter: Filter) -> List {
        List(Selector {
            arguments: Arguments::new(page, per_page).unwrap(),
            filter,
        })
    }

    #[tokio::test]
    async fn paginates() {
        let svc = service(5);

        let page = svc.execute(list(1, 2, Filter::All)).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 1);
        assert!(page.more_pages);

        let page = svc.execute(list(3, 2, Filter::All)).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].logon_name.to_string(), "testuser5");
        assert!(!page.more_pages);

        for per_page in 1..=5 {
            let mut seen = 0;
            let mut page_num = 1;
            loop {
                let page = svc
                    .execute(list(page_num, per_page, Filter::All))
                    .await
                    .unwrap();
                assert!(page.items.len() <= per_page);
                seen += page.items.len();
                if !page.more_pages {
                    break;
                }
                page_num += 1;
            }
            assert_eq!(seen, 5);
        }
    }

    #[tokio::test]
    async fn rejects_page_beyond_range() {
        let svc = service(5);

        let err = svc.execute(list(4, 2, Filter::All)).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::PageNotFound(4)));
        assert_eq!(err.as_ref().to_string(), "page 4 not found");
    }

    #[tokio::test]
    async fn serves_empty_first_page() {
        let svc = service(0);

        let page = svc.execute(list(1, 2, Filter::All)).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.more_pages);

        let err = svc.execute(list(2, 2, Filter::All)).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::PageNotFound(2)));
    }

    #[tokio::test]
    async fn filters_by_full_name() {
        let svc = service(12);

        let page = svc
            .execute(list(1, 5, Filter::FullName("User 1".into())))
            .await
            .unwrap();
        assert_eq!(page.total_pages, 1);
        let names = page
            .items
            .iter()
            .map(|u| u.logon_name.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["testuser1", "testuser10", "testuser11", "testuser12"]);
    }
}
