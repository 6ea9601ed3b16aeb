//! In-memory `Store` for tests. One mutex guards all tables, so every trait
//! method is trivially a single unit of work.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::engagement::{CommentRow, LikeRow, LikeToggle, NewComment};
use crate::models::job_post::{JobPostChanges, JobPostRow, NewJobPost};
use crate::models::post::{NewPost, PostChanges, PostRow};
use crate::models::resume::{CoverLetterRow, ResumeRow};
use crate::models::user::{ProfilePatch, ProfileRow, UserRow, UserSummary};
use crate::store::{
    ContentStore, DocumentStore, EngagementStore, NewUser, StoreError, UserChanges, UserStore,
};

#[derive(Default)]
struct Tables {
    clock: Option<DateTime<Utc>>,
    users: Vec<UserRow>,
    profiles: Vec<ProfileRow>,
    posts: Vec<PostRow>,
    job_posts: Vec<JobPostRow>,
    likes: Vec<LikeRow>,
    comments: Vec<CommentRow>,
    resumes: Vec<ResumeRow>,
    cover_letters: Vec<CoverLetterRow>,
}

impl Tables {
    /// Strictly increasing timestamps so ordering assertions are deterministic.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.clock {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.clock = Some(next);
        next
    }

    fn profile_email(&mut self, user_id: Uuid, email: &str) {
        for profile in self.profiles.iter_mut().filter(|p| p.user_id == user_id) {
            profile.email = email.to_string();
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    user_batch_lookups: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `users_by_ids` has been called.
    pub fn user_batch_lookups(&self) -> usize {
        self.user_batch_lookups.load(Ordering::SeqCst)
    }

    /// Number of like markers for `post_id`, counted from the rows.
    pub fn like_rows(&self, post_id: Uuid) -> usize {
        let tables = self.tables.lock().unwrap();
        tables.likes.iter().filter(|l| l.job_id == post_id).count()
    }

    /// Number of like markers for a (user, post) pair.
    pub fn like_rows_for(&self, user_id: Uuid, post_id: Uuid) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .likes
            .iter()
            .filter(|l| l.user_id == user_id && l.job_id == post_id)
            .count()
    }

    pub fn comment_rows(&self, post_id: Uuid) -> usize {
        let tables = self.tables.lock().unwrap();
        tables.comments.iter().filter(|c| c.job_id == post_id).count()
    }

    /// Back-dates a reset token so expiry paths can be exercised.
    pub fn expire_reset_token(&self, user_id: Uuid) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.reset_token_expiry = Some(Utc::now() - Duration::minutes(1));
        }
    }
}

fn newest_first<T: Clone>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|r| std::cmp::Reverse(key(r)));
    rows
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user_with_profile(&self, user: NewUser) -> Result<UserRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("Email"));
        }
        let now = tables.tick();
        let row = UserRow {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            reset_token: None,
            reset_token_expiry: None,
            created_at: now,
            updated_at: now,
        };
        tables.profiles.push(ProfileRow {
            id: Uuid::new_v4(),
            user_id: row.id,
            email: row.email.clone(),
            full_name: row.name.clone(),
            bio: String::new(),
            location: String::new(),
            company: String::new(),
            contact_email: row.email.clone(),
            age: 0,
            skills: Vec::new(),
            interests: Vec::new(),
            loc_preference: None,
            working_experience: 0,
            professional_headline: String::new(),
            profile_pic_id: None,
            github_link: None,
            linkedin_link: None,
            twitter_link: None,
            website_link: None,
        });
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().map(UserRow::summary).collect())
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, StoreError> {
        self.user_batch_lookups.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(UserRow::summary)
            .collect())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<UserRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(email) = &changes.email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Duplicate("Email"));
            }
        }
        let now = tables.tick();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = now;
        let row = user.clone();
        tables.profile_email(id, &row.email);
        Ok(row)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.users.iter().any(|u| u.id == id) {
            return Err(StoreError::NotFound("User"));
        }
        let owned_posts: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        let liked: Vec<Uuid> = tables
            .likes
            .iter()
            .filter(|l| l.user_id == id)
            .map(|l| l.job_id)
            .collect();
        for post in tables.posts.iter_mut().filter(|p| liked.contains(&p.id)) {
            post.likes = (post.likes - 1).max(0);
        }
        tables.users.retain(|u| u.id != id);
        tables.profiles.retain(|p| p.user_id != id);
        tables.posts.retain(|p| p.author_id != id);
        tables.job_posts.retain(|j| j.author_id != id);
        tables
            .likes
            .retain(|l| l.user_id != id && !owned_posts.contains(&l.job_id));
        tables
            .comments
            .retain(|c| c.author_id != id && !owned_posts.contains(&c.job_id));
        tables.resumes.retain(|r| r.user_id != id);
        tables.cover_letters.retain(|c| c.user_id != id);
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        user.reset_token = Some(token.to_string());
        user.reset_token_expiry = Some(expiry);
        Ok(())
    }

    async fn find_user_by_reset_token(&self, token: &str) -> Result<Option<UserRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn reset_password(&self, id: Uuid, password_hash: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(StoreError::NotFound("User"))?;
        user.password_hash = password_hash.to_string();
        user.reset_token = None;
        user.reset_token_expiry = None;
        Ok(())
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.profiles.iter().find(|p| p.user_id == user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        patch: &ProfilePatch,
    ) -> Result<ProfileRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or(StoreError::NotFound("Profile"))?;

        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        set(&mut profile.full_name, &patch.full_name);
        set(&mut profile.bio, &patch.bio);
        set(&mut profile.location, &patch.location);
        set(&mut profile.company, &patch.company);
        set(&mut profile.contact_email, &patch.contact_email);
        set(&mut profile.age, &patch.age);
        set(&mut profile.skills, &patch.skills);
        set(&mut profile.interests, &patch.interests);
        set_opt(&mut profile.loc_preference, &patch.loc_preference);
        set(&mut profile.working_experience, &patch.working_experience);
        set(&mut profile.professional_headline, &patch.professional_headline);
        set_opt(&mut profile.profile_pic_id, &patch.profile_pic_id);
        set_opt(&mut profile.github_link, &patch.github_link);
        set_opt(&mut profile.linkedin_link, &patch.linkedin_link);
        set_opt(&mut profile.twitter_link, &patch.twitter_link);
        set_opt(&mut profile.website_link, &patch.website_link);
        Ok(profile.clone())
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create_post(&self, post: NewPost) -> Result<PostRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let row = PostRow {
            id: Uuid::new_v4(),
            content: post.content,
            media_url: post.media_url,
            media_type: post.media_type,
            author_id: post.author_id,
            likes: 0,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(row.clone());
        Ok(row)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<PostRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(tables.posts.iter().cloned(), |p| p.created_at))
    }

    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<PostRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables.posts.iter().filter(|p| p.author_id == author_id).cloned(),
            |p| p.created_at,
        ))
    }

    async fn update_post(&self, id: Uuid, changes: &PostChanges) -> Result<PostRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound("Post"))?;
        if let Some(content) = &changes.content {
            post.content = content.clone();
        }
        if changes.media_url.is_some() {
            post.media_url = changes.media_url.clone();
        }
        if changes.media_type.is_some() {
            post.media_type = changes.media_type.clone();
        }
        post.updated_at = now;
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(StoreError::NotFound("Post"));
        }
        tables.likes.retain(|l| l.job_id != id);
        tables.comments.retain(|c| c.job_id != id);
        Ok(())
    }

    async fn create_job_post(&self, job: NewJobPost) -> Result<JobPostRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let row = JobPostRow {
            id: Uuid::new_v4(),
            title: job.title,
            company: job.company,
            description: job.description,
            location: job.location,
            work_type: job.work_type,
            experience_level: job.experience_level,
            is_active: true,
            author_id: job.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.job_posts.push(row.clone());
        Ok(row)
    }

    async fn find_job_post(&self, id: Uuid) -> Result<Option<JobPostRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.job_posts.iter().find(|j| j.id == id).cloned())
    }

    async fn list_job_posts(&self) -> Result<Vec<JobPostRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(tables.job_posts.iter().cloned(), |j| j.created_at))
    }

    async fn job_posts_by_author(&self, author_id: Uuid) -> Result<Vec<JobPostRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .job_posts
                .iter()
                .filter(|j| j.author_id == author_id)
                .cloned(),
            |j| j.created_at,
        ))
    }

    async fn update_job_post(
        &self,
        id: Uuid,
        changes: &JobPostChanges,
    ) -> Result<JobPostRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let job = tables
            .job_posts
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(StoreError::NotFound("Job post"))?;
        if let Some(v) = &changes.title {
            job.title = v.clone();
        }
        if let Some(v) = &changes.company {
            job.company = v.clone();
        }
        if let Some(v) = &changes.description {
            job.description = v.clone();
        }
        if let Some(v) = &changes.location {
            job.location = v.clone();
        }
        if let Some(v) = changes.work_type {
            job.work_type = v;
        }
        if let Some(v) = changes.experience_level {
            job.experience_level = v;
        }
        if let Some(v) = changes.is_active {
            job.is_active = v;
        }
        job.updated_at = now;
        Ok(job.clone())
    }

    async fn delete_job_post(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.job_posts.len();
        tables.job_posts.retain(|j| j.id != id);
        if tables.job_posts.len() == before {
            return Err(StoreError::NotFound("Job post"));
        }
        Ok(())
    }
}

#[async_trait]
impl EngagementStore for MemoryStore {
    async fn toggle_like(&self, user_id: Uuid, post_id: Uuid) -> Result<LikeToggle, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.posts.iter().any(|p| p.id == post_id) {
            return Err(StoreError::NotFound("Post"));
        }
        let existing = tables
            .likes
            .iter()
            .position(|l| l.user_id == user_id && l.job_id == post_id);
        let (liked, delta) = match existing {
            Some(idx) => {
                tables.likes.remove(idx);
                (false, -1)
            }
            None => {
                let now = tables.tick();
                tables.likes.push(LikeRow {
                    id: Uuid::new_v4(),
                    user_id,
                    job_id: post_id,
                    created_at: now,
                    updated_at: now,
                });
                (true, 1)
            }
        };
        let post = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(StoreError::NotFound("Post"))?;
        post.likes = (post.likes + delta).max(0);
        Ok(LikeToggle {
            liked,
            likes: post.likes,
        })
    }

    async fn create_comment(&self, comment: NewComment) -> Result<CommentRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let row = CommentRow {
            id: Uuid::new_v4(),
            content: comment.content,
            job_id: comment.job_id,
            author_id: comment.author_id,
            created_at: now,
            updated_at: now,
        };
        if let Some(post) = tables.posts.iter_mut().find(|p| p.id == comment.job_id) {
            post.comments_count += 1;
        }
        tables.comments.push(row.clone());
        Ok(row)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<CommentRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<CommentRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<CommentRow> = tables
            .comments
            .iter()
            .filter(|c| c.job_id == post_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.created_at);
        Ok(rows)
    }

    async fn update_comment(&self, id: Uuid, content: &str) -> Result<CommentRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let comment = tables
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound("Comment"))?;
        comment.content = content.to_string();
        comment.updated_at = now;
        Ok(comment.clone())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        if tables.comments.len() == before {
            return Err(StoreError::NotFound("Comment"));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_resume(&self, user_id: Uuid, file_url: &str) -> Result<ResumeRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let row = ResumeRow {
            id: Uuid::new_v4(),
            user_id,
            file_url: file_url.to_string(),
            created_at: now,
        };
        tables.resumes.push(row.clone());
        Ok(row)
    }

    async fn resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables.resumes.iter().filter(|r| r.user_id == user_id).cloned(),
            |r| r.created_at,
        ))
    }

    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.resumes.len();
        tables.resumes.retain(|r| r.id != id);
        if tables.resumes.len() == before {
            return Err(StoreError::NotFound("Resume"));
        }
        Ok(())
    }

    async fn create_cover_letter(
        &self,
        user_id: Uuid,
        file_url: &str,
    ) -> Result<CoverLetterRow, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let now = tables.tick();
        let row = CoverLetterRow {
            id: Uuid::new_v4(),
            user_id,
            file_url: file_url.to_string(),
            created_at: now,
        };
        tables.cover_letters.push(row.clone());
        Ok(row)
    }

    async fn cover_letters_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CoverLetterRow>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(newest_first(
            tables
                .cover_letters
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned(),
            |c| c.created_at,
        ))
    }
}
