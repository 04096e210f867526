//! Article domain model.
//!
//! # Responsibility
//! - Hold title/author/publication metadata and mutable content.
//! - Derive previews and word statistics from the current content.
//! - Track edit time and sequential identity.
//!
//! # Invariants
//! - `id` comes from the `ArticleIds` counter passed at construction.
//! - `last_edited` is `None` until the first `set_content*` call.
//! - Ordering uses `publication_date` only; equal dates keep input order.

use crate::analysis::content::{most_common_words, short_introduction, WordCounts};
use crate::model::field::{FieldOwner, FieldStore};
use crate::model::repr::{iso_datetime, quote_literal, short_type_name};
use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use serde::Serialize;
use std::any::Any;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Sequential article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

impl Display for ArticleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source shared by everything that constructs articles.
///
/// Starts at 0 and hands out each id exactly once until [`ArticleIds::reset`].
#[derive(Debug, Default)]
pub struct ArticleIds {
    next: AtomicU64,
}

impl ArticleIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the next id and advances the counter by one.
    pub fn next_id(&self) -> ArticleId {
        ArticleId(self.next.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Id the next constructed article will receive.
    pub fn peek(&self) -> ArticleId {
        ArticleId(self.next.load(AtomicOrdering::Relaxed))
    }

    /// Restarts numbering at 0.
    pub fn reset(&self) {
        self.next.store(0, AtomicOrdering::Relaxed);
        info!("event=article_ids_reset module=article status=ok");
    }
}

/// Source of "now" for edit timestamps.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Returned when an article is compared with something that is not an article.
///
/// Callers holding both operands can retry the comparison the other way round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderingUnsupported;

impl Display for OrderingUnsupported {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ordering is only supported between 'Article' values")
    }
}

impl Error for OrderingUnsupported {}

/// A published piece of writing with mutable content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Article {
    id: ArticleId,
    title: String,
    author: String,
    publication_date: NaiveDateTime,
    content: String,
    last_edited: Option<NaiveDateTime>,
    /// Values of validated attributes attached to this article.
    fields: FieldStore,
}

impl Article {
    /// Creates an article, taking its id from `ids`.
    ///
    /// The initial content is not an edit: `last_edited` starts as `None`.
    pub fn new(
        ids: &ArticleIds,
        title: impl Into<String>,
        author: impl Into<String>,
        publication_date: NaiveDateTime,
        content: impl Into<String>,
    ) -> Self {
        let article = Self {
            id: ids.next_id(),
            title: title.into(),
            author: author.into(),
            publication_date,
            content: content.into(),
            last_edited: None,
            fields: FieldStore::new(),
        };
        debug!(
            "event=article_create module=article status=ok id={} content_chars={}",
            article.id,
            article.length()
        );
        article
    }

    pub fn id(&self) -> ArticleId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publication_date(&self) -> NaiveDateTime {
        self.publication_date
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn last_edited(&self) -> Option<NaiveDateTime> {
        self.last_edited
    }

    /// Replaces the content and stamps `last_edited` with the local time.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.set_content_with(content, &SystemClock);
    }

    /// Replaces the content and stamps `last_edited` from `clock`.
    pub fn set_content_with<C>(&mut self, content: impl Into<String>, clock: &C)
    where
        C: Clock + ?Sized,
    {
        self.content = content.into();
        let edited_at = clock.now();
        self.last_edited = Some(edited_at);
        debug!(
            "event=article_edit module=article status=ok id={} content_chars={} edited_at={}",
            self.id,
            self.length(),
            iso_datetime(&edited_at)
        );
    }

    /// Content length in characters.
    pub fn length(&self) -> usize {
        self.content.chars().count()
    }

    /// Content cut back to a word boundary within `n_characters`.
    pub fn short_introduction(&self, n_characters: usize) -> String {
        short_introduction(&self.content, n_characters)
    }

    /// The `n_words` most common words of the content, most frequent first.
    pub fn most_common_words(&self, n_words: usize) -> WordCounts {
        most_common_words(&self.content, n_words)
    }

    /// Orders by publication date only.
    pub fn compare(&self, other: &Article) -> Ordering {
        self.publication_date.cmp(&other.publication_date)
    }

    /// Compares with a value of any type, failing unless it is an `Article`.
    ///
    /// A `Box<dyn Any>` holding an article is looked through.
    pub fn compare_any(&self, other: &dyn Any) -> Result<Ordering, OrderingUnsupported> {
        if let Some(article) = other.downcast_ref::<Article>() {
            return Ok(self.compare(article));
        }
        match other.downcast_ref::<Box<dyn Any>>() {
            Some(boxed) => self.compare_any(boxed.as_ref()),
            None => Err(OrderingUnsupported),
        }
    }
}

/// Types that are, or wrap, an [`Article`].
///
/// `render` names the implementing type, so wrappers get their own name in
/// the representation without overriding anything.
pub trait Publication {
    fn article(&self) -> &Article;

    fn class_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    /// `<ClassName title=... author=... publication_date='...'>`
    fn render(&self) -> String {
        let article = self.article();
        format!(
            "<{} title={} author={} publication_date={}>",
            self.class_name(),
            quote_literal(article.title()),
            quote_literal(article.author()),
            quote_literal(&iso_datetime(&article.publication_date()))
        )
    }
}

impl Publication for Article {
    fn article(&self) -> &Article {
        self
    }
}

impl Display for Article {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

impl FieldOwner for Article {
    fn owner_type_name(&self) -> &str {
        self.class_name()
    }

    fn field_store(&self) -> &FieldStore {
        &self.fields
    }

    fn field_store_mut(&mut self) -> &mut FieldStore {
        &mut self.fields
    }
}

/// Natural order of publications: stable sort by publication date,
/// equal dates keep their input order.
pub fn sort_by_publication<P: Publication>(items: &mut [P]) {
    items.sort_by(|left, right| left.article().compare(right.article()));
}
