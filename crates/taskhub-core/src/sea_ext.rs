use sea_orm::{
    ColumnTrait, Condition, EntityTrait, IntoSimpleExpr, Order, QueryFilter, QueryOrder,
    QuerySelect, Select,
    sea_query::{Expr, Func},
};
use taskhub_domain::pagination::PageRequest;
use taskhub_domain::sort::SortOrder;

/// Apply a [`PageRequest`] as `OFFSET`/`LIMIT`.
pub trait Paged {
    fn paged(self, page: PageRequest) -> Self;
}

impl<E> Paged for Select<E>
where
    E: EntityTrait,
{
    fn paged(self, page: PageRequest) -> Self {
        self.offset(page.offset()).limit(page.limit())
    }
}

/// Order by a chosen column, breaking ties on a second one in the same direction.
pub trait Sorted {
    fn sorted<C>(self, column: C, tie_break: C, order: SortOrder) -> Self
    where
        C: ColumnTrait;
}

impl<E> Sorted for Select<E>
where
    E: EntityTrait,
{
    fn sorted<C>(self, column: C, tie_break: C, order: SortOrder) -> Self
    where
        C: ColumnTrait,
    {
        let order = match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        self.order_by(column, order.clone()).order_by(tie_break, order)
    }
}

/// Case-insensitive substring match across several columns.
pub trait SearchAny {
    /// No-op when `term` is absent or blank.
    fn search_any<C>(self, columns: &[C], term: Option<&str>) -> Self
    where
        C: ColumnTrait;
}

impl<E> SearchAny for Select<E>
where
    E: EntityTrait,
{
    fn search_any<C>(self, columns: &[C], term: Option<&str>) -> Self
    where
        C: ColumnTrait,
    {
        let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
            return self;
        };
        let pattern = format!("%{}%", term.to_lowercase());
        let condition = columns.iter().fold(Condition::any(), |cond, col| {
            cond.add(Expr::expr(Func::lower((*col).into_simple_expr())).like(pattern.as_str()))
        });
        self.filter(condition)
    }
}
