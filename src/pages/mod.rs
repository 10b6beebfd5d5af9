//! Page aggregation: one read model per page.
//!
//! Every view is recomputed from the stores on each call. The aggregator
//! only sees the [`RecordStore`] and [`UploadStore`] traits, never the
//! filesystem, so it runs against the in-memory stores in tests.

use crate::Result;
use crate::models::{
    Collection, ContactMessage, LogEntry, Profile, Record, SocialPost, Upload, UploadCategory,
};
use crate::storage::{RecordStore, UploadStore, seed};
use serde::Serialize;

/// Maximum number of entries per section on the public share page.
pub const PREVIEW_LIMIT: usize = 5;

/// Display name used when the profile has no name.
pub const DEFAULT_PROFILE_NAME: &str = "Student Portfolio";

/// The first few items of a longer list, plus the full length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Preview<T> {
    pub fn new(all: Vec<T>, limit: usize) -> Self {
        let total = all.len();
        let items = all.into_iter().take(limit).collect();
        Self { items, total }
    }

    /// Whether the preview is hiding entries.
    pub fn has_more(&self) -> bool {
        self.total > self.items.len()
    }
}

/// Per-source item counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub assignments: usize,
    pub videos: usize,
    pub gallery: usize,
    pub learning_log: usize,
    pub social: usize,
    pub contacts: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.assignments
            + self.videos
            + self.gallery
            + self.learning_log
            + self.social
            + self.contacts
    }
}

/// Coarse description of how much the portfolio holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Empty,
    GettingStarted,
    Active,
}

impl ActivityLevel {
    pub fn from_total(total: usize) -> Self {
        match total {
            0 => Self::Empty,
            1..=5 => Self::GettingStarted,
            _ => Self::Active,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::GettingStarted => "getting started",
            Self::Active => "active",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub assignments: usize,
    pub gallery: usize,
    pub learning_entries: usize,
    /// Most recently created video, by recorded creation time
    pub latest_video: Option<Upload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub counts: Counts,
    pub total: usize,
    pub activity: ActivityLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningLogView {
    /// Entries written through the form, newest first
    pub entries: Vec<LogEntry>,
    /// PSE lab activities, in stored order
    pub lab: Vec<LogEntry>,
}

impl LearningLogView {
    pub fn total(&self) -> usize {
        self.entries.len() + self.lab.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabView {
    pub collection: Collection,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareView {
    pub profile: Profile,
    pub assignments: Vec<Upload>,
    pub videos: Vec<Upload>,
    pub gallery: Vec<Upload>,
    pub learning_log: Preview<LogEntry>,
    pub social: Preview<SocialPost>,
}

impl ShareView {
    /// Name shown as the page heading.
    pub fn display_name(&self) -> &str {
        if self.profile.name.is_empty() {
            DEFAULT_PROFILE_NAME
        } else {
            &self.profile.name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentShareView {
    pub upload: Upload,
    pub profile: Profile,
}

/// Builds page read models from the two stores.
pub struct Pages<'a> {
    records: &'a dyn RecordStore,
    uploads: &'a dyn UploadStore,
}

/// Records of a collection as typed views, newest first.
fn newest_first<T>(records: Vec<Record>) -> Vec<T>
where
    T: for<'r> From<&'r Record>,
{
    records.iter().rev().map(T::from).collect()
}

impl<'a> Pages<'a> {
    pub fn new(records: &'a dyn RecordStore, uploads: &'a dyn UploadStore) -> Self {
        Self { records, uploads }
    }

    pub fn counts(&self) -> Result<Counts> {
        Ok(Counts {
            assignments: self.uploads.count(UploadCategory::Assignment)?,
            videos: self.uploads.count(UploadCategory::Video)?,
            gallery: self.uploads.count(UploadCategory::Image)?,
            learning_log: self.records.read(Collection::LearningLog).len(),
            social: self.records.read(Collection::Social).len(),
            contacts: self.records.read(Collection::Contacts).len(),
        })
    }

    pub fn home(&self) -> Result<HomeView> {
        Ok(HomeView {
            assignments: self.uploads.count(UploadCategory::Assignment)?,
            gallery: self.uploads.count(UploadCategory::Image)?,
            learning_entries: self.records.read(Collection::LearningLog).len(),
            latest_video: self.uploads.list(UploadCategory::Video)?.pop(),
        })
    }

    pub fn dashboard(&self) -> Result<DashboardView> {
        let counts = self.counts()?;
        let total = counts.total();
        Ok(DashboardView {
            counts,
            total,
            activity: ActivityLevel::from_total(total),
        })
    }

    /// Uploads of one category, oldest first.
    pub fn uploads(&self, category: UploadCategory) -> Result<Vec<Upload>> {
        self.uploads.list(category)
    }

    /// Learning log entries plus the PSE lab record, seeding the lab if needed.
    pub fn learning_log(&self) -> Result<LearningLogView> {
        let entries = newest_first(self.records.read(Collection::LearningLog));
        let lab = self.lab(Collection::PseLab)?.entries;
        Ok(LearningLogView { entries, lab })
    }

    /// A lab collection in stored order, seeding it on first access.
    pub fn lab(&self, collection: Collection) -> Result<LabView> {
        seed::ensure(self.records, collection)?;
        let entries = self
            .records
            .read(collection)
            .iter()
            .map(LogEntry::from)
            .collect();
        Ok(LabView {
            collection,
            entries,
        })
    }

    pub fn social(&self) -> Vec<SocialPost> {
        newest_first(self.records.read(Collection::Social))
    }

    pub fn contacts(&self) -> Vec<ContactMessage> {
        newest_first(self.records.read(Collection::Contacts))
    }

    /// Stored profile, or an empty one.
    pub fn profile(&self) -> Profile {
        self.records.load_profile().unwrap_or_default()
    }

    /// The public portfolio page.
    pub fn share(&self) -> Result<ShareView> {
        Ok(ShareView {
            profile: self.profile(),
            assignments: self.uploads.list(UploadCategory::Assignment)?,
            videos: self.uploads.list(UploadCategory::Video)?,
            gallery: self.uploads.list(UploadCategory::Image)?,
            learning_log: Preview::new(
                newest_first(self.records.read(Collection::LearningLog)),
                PREVIEW_LIMIT,
            ),
            social: Preview::new(self.social(), PREVIEW_LIMIT),
        })
    }

    /// The public page for one assignment, if it exists.
    pub fn assignment_share(&self, stored_name: &str) -> Result<Option<AssignmentShareView>> {
        let Some(upload) = self.uploads.resolve(UploadCategory::Assignment, stored_name)? else {
            return Ok(None);
        };
        Ok(Some(AssignmentShareView {
            upload,
            profile: self.profile(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::{MemoryRecordStore, MemoryUploadStore};

    struct Fixture {
        records: MemoryRecordStore,
        uploads: MemoryUploadStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                records: MemoryRecordStore::new(),
                uploads: MemoryUploadStore::new(),
            }
        }

        fn pages(&self) -> Pages<'_> {
            Pages::new(&self.records, &self.uploads)
        }

        fn log(&self, n: usize) {
            for i in 0..n {
                self.records
                    .append(
                        Collection::LearningLog,
                        Record::new()
                            .with("title", format!("entry {}", i))
                            .with("content", "notes"),
                    )
                    .unwrap();
            }
        }

        fn posts(&self, n: usize) {
            for i in 0..n {
                self.records
                    .append(
                        Collection::Social,
                        Record::new()
                            .with("name", format!("poster {}", i))
                            .with("message", "hello"),
                    )
                    .unwrap();
            }
        }
    }

    #[test]
    fn test_dashboard_total_is_sum_of_counts() {
        let f = Fixture::new();
        f.uploads.insert(UploadCategory::Assignment, "1-a.pdf", b"a");
        f.uploads.insert(UploadCategory::Assignment, "2-b.pdf", b"b");
        f.uploads.insert(UploadCategory::Video, "3-intro.mp4", b"v");
        f.log(3);
        f.posts(1);

        let dashboard = f.pages().dashboard().unwrap();
        assert_eq!(
            dashboard.counts,
            Counts {
                assignments: 2,
                videos: 1,
                gallery: 0,
                learning_log: 3,
                social: 1,
                contacts: 0,
            }
        );
        assert_eq!(dashboard.total, 7);
        assert_eq!(dashboard.activity, ActivityLevel::Active);
    }

    #[test]
    fn test_dashboard_empty() {
        let f = Fixture::new();
        let dashboard = f.pages().dashboard().unwrap();
        assert_eq!(dashboard.total, 0);
        assert_eq!(dashboard.activity, ActivityLevel::Empty);
    }

    #[test]
    fn test_activity_levels() {
        assert_eq!(ActivityLevel::from_total(0), ActivityLevel::Empty);
        assert_eq!(ActivityLevel::from_total(1), ActivityLevel::GettingStarted);
        assert_eq!(ActivityLevel::from_total(5), ActivityLevel::GettingStarted);
        assert_eq!(ActivityLevel::from_total(6), ActivityLevel::Active);
    }

    #[test]
    fn test_share_caps_previews_newest_first() {
        let f = Fixture::new();
        f.log(8);
        f.posts(2);

        let share = f.pages().share().unwrap();
        assert_eq!(share.learning_log.items.len(), 5);
        assert_eq!(share.learning_log.total, 8);
        assert!(share.learning_log.has_more());
        assert_eq!(share.learning_log.items[0].title, "entry 7");
        assert_eq!(share.learning_log.items[4].title, "entry 3");

        assert_eq!(share.social.items.len(), 2);
        assert!(!share.social.has_more());
        assert_eq!(share.social.items[0].name, "poster 1");
    }

    #[test]
    fn test_share_lists_uploads_and_default_name() {
        let f = Fixture::new();
        f.uploads.insert(UploadCategory::Image, "5-b.png", b"");
        f.uploads.insert(UploadCategory::Image, "4-a.png", b"");

        let share = f.pages().share().unwrap();
        assert_eq!(share.display_name(), DEFAULT_PROFILE_NAME);
        assert_eq!(share.gallery.len(), 2);
        assert_eq!(share.gallery[0].stored_name, "4-a.png");
        assert!(share.assignments.is_empty());

        f.records.save_profile(&Profile::new("Ada", "bio")).unwrap();
        assert_eq!(f.pages().share().unwrap().display_name(), "Ada");
    }

    #[test]
    fn test_home_latest_video_uses_creation_time() {
        let f = Fixture::new();
        f.uploads.insert(UploadCategory::Video, "1700000000002-old-name-z.mp4", b"");
        f.uploads.insert(UploadCategory::Video, "1700000000009-newest.mp4", b"");
        f.uploads.insert(UploadCategory::Video, "1700000000005-middle.mp4", b"");

        let home = f.pages().home().unwrap();
        assert_eq!(
            home.latest_video.map(|v| v.stored_name),
            Some("1700000000009-newest.mp4".to_string())
        );
    }

    #[test]
    fn test_home_counts() {
        let f = Fixture::new();
        f.uploads.insert(UploadCategory::Assignment, "1-a.pdf", b"");
        f.log(2);
        let home = f.pages().home().unwrap();
        assert_eq!(home.assignments, 1);
        assert_eq!(home.gallery, 0);
        assert_eq!(home.learning_entries, 2);
        assert!(home.latest_video.is_none());
    }

    #[test]
    fn test_lab_seeds_on_first_access_only() {
        let f = Fixture::new();
        assert_eq!(f.pages().lab(Collection::PseLab).unwrap().entries.len(), 20);
        assert_eq!(f.pages().lab(Collection::PeseLab).unwrap().entries.len(), 50);

        let first = f.records.read(Collection::PeseLab);
        let again = f.pages().lab(Collection::PeseLab).unwrap();
        assert_eq!(again.entries.len(), 50);
        assert_eq!(f.records.read(Collection::PeseLab), first);
    }

    #[test]
    fn test_learning_log_combines_entries_and_lab() {
        let f = Fixture::new();
        f.log(2);
        let view = f.pages().learning_log().unwrap();
        assert_eq!(view.entries.len(), 2);
        assert_eq!(view.entries[0].title, "entry 1");
        assert_eq!(view.lab.len(), 20);
        assert_eq!(view.total(), 22);
        assert!(f.records.exists(Collection::PseLab));
    }

    #[test]
    fn test_lab_seed_failure_propagates() {
        let f = Fixture::new();
        f.records.set_simulate_write_error(true);
        assert!(f.pages().lab(Collection::PseLab).is_err());
    }

    #[test]
    fn test_social_and_contacts_newest_first() {
        let f = Fixture::new();
        f.posts(3);
        for name in ["first", "second"] {
            f.records
                .append(
                    Collection::Contacts,
                    Record::new()
                        .with("name", name)
                        .with("email", "x@example.com")
                        .with("message", "hi"),
                )
                .unwrap();
        }
        assert_eq!(f.pages().social()[0].name, "poster 2");
        let contacts = f.pages().contacts();
        assert_eq!(contacts[0].name, "second");
        assert_eq!(contacts[1].email, "x@example.com");
    }

    #[test]
    fn test_assignment_share() {
        let f = Fixture::new();
        f.uploads.insert(UploadCategory::Assignment, "10-essay.pdf", b"");
        f.records.save_profile(&Profile::new("Ada", "")).unwrap();

        let view = f.pages().assignment_share("10-essay.pdf").unwrap().unwrap();
        assert_eq!(view.upload.stored_name, "10-essay.pdf");
        assert_eq!(view.profile.name, "Ada");
        assert!(f.pages().assignment_share("11-missing.pdf").unwrap().is_none());
        assert!(f.pages().assignment_share("../profile.json").unwrap().is_none());
    }

    #[test]
    fn test_preview_new() {
        let preview = Preview::new(vec![1, 2, 3], 5);
        assert_eq!(preview.items, vec![1, 2, 3]);
        assert!(!preview.has_more());
        let preview = Preview::new((0..10).collect(), 5);
        assert_eq!(preview.items.len(), 5);
        assert_eq!(preview.total, 10);
    }
}
