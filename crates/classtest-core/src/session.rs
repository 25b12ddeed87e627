//! Volatile session state: who is logged in, which view is showing, and the
//! answers being typed for the selected test.
//!
//! The session owns no submissions. Every action that changes persisted state
//! takes the store by reference and goes through its operations.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, Utc};

use crate::catalog::Catalog;
use crate::error::SessionError;
use crate::model::{Role, Submission, TestVariant, User};
use crate::schedule::SchoolHours;
use crate::storage::Storage;
use crate::store::SubmissionStore;

/// The single name that unlocks the teacher role.
pub const DEFAULT_TEACHER_NAME: &str = "никитовский";

/// Which screen the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    TestSelection,
    TestInterface,
    TeacherDashboard,
}

#[derive(Debug, Clone)]
pub struct Session {
    teacher_name: String,
    user: Option<User>,
    view: View,
    selected_test: Option<String>,
    draft: BTreeMap<u32, String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_TEACHER_NAME)
    }
}

impl Session {
    /// A logged-out session accepting `teacher_name` as the teacher credential.
    pub fn new(teacher_name: impl Into<String>) -> Self {
        Self {
            teacher_name: teacher_name.into(),
            user: None,
            view: View::Login,
            selected_test: None,
            draft: BTreeMap::new(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn selected_test(&self) -> Option<&str> {
        self.selected_test.as_deref()
    }

    pub fn draft(&self) -> &BTreeMap<u32, String> {
        &self.draft
    }

    /// Log in. Names are trimmed; the teacher role needs the credential name,
    /// compared case-insensitively.
    pub fn login(&mut self, name: &str, role: Role) -> Result<&User, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        if role == Role::Teacher && name.to_lowercase() != self.teacher_name.to_lowercase() {
            return Err(SessionError::InvalidTeacherName(name.to_string()));
        }

        tracing::debug!(user = %name, %role, "logged in");
        self.view = match role {
            Role::Student => View::TestSelection,
            Role::Teacher => View::TeacherDashboard,
        };
        self.selected_test = None;
        self.draft.clear();
        Ok(&*self.user.insert(User {
            name: name.to_string(),
            role,
        }))
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.view = View::Login;
        self.selected_test = None;
        self.draft.clear();
    }

    /// Refuse student work outside school hours.
    pub fn ensure_open(&self, hours: &SchoolHours, now: NaiveTime) -> Result<(), SessionError> {
        let role = self.user.as_ref().ok_or(SessionError::NotLoggedIn)?.role;
        if hours.availability(role, now).is_open() {
            Ok(())
        } else {
            Err(SessionError::Closed)
        }
    }

    /// Enter the test flow for a variant.
    ///
    /// Blocked while the student's existing submission is locked and no retake
    /// has been granted.
    pub fn select_test<'c, S: Storage>(
        &mut self,
        store: &SubmissionStore<S>,
        catalog: &'c Catalog,
        variant_id: &str,
    ) -> Result<&'c TestVariant, SessionError> {
        let student = self.require(Role::Student)?.name.clone();
        let variant = catalog
            .get(variant_id)
            .ok_or_else(|| SessionError::UnknownVariant(variant_id.to_string()))?;

        if let Some(existing) = store.find(&student, variant_id) {
            if !existing.may_start() {
                return Err(SessionError::AlreadySubmitted {
                    variant_id: variant_id.to_string(),
                });
            }
        }

        self.selected_test = Some(variant.id.clone());
        self.draft.clear();
        self.view = View::TestInterface;
        Ok(variant)
    }

    /// Leave the test flow without submitting.
    pub fn back_to_selection(&mut self) {
        self.selected_test = None;
        self.draft.clear();
        if self.user.is_some() {
            self.view = View::TestSelection;
        }
    }

    /// Set the draft answer for one question of the selected test.
    pub fn answer(
        &mut self,
        catalog: &Catalog,
        question_id: u32,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        let variant = self.selected_variant(catalog)?;
        if variant.question(question_id).is_none() {
            return Err(SessionError::UnknownQuestion {
                variant_id: variant.id.clone(),
                question_id,
            });
        }
        self.draft.insert(question_id, text.into());
        Ok(())
    }

    /// `(answered, total)` for the selected test; blank answers do not count.
    pub fn progress(&self, catalog: &Catalog) -> Result<(usize, usize), SessionError> {
        let variant = self.selected_variant(catalog)?;
        let answered = variant
            .questions
            .iter()
            .filter(|q| self.has_answer(q.id))
            .count();
        Ok((answered, variant.questions.len()))
    }

    /// Submit the draft for the selected test and return to test selection.
    pub fn submit<S: Storage>(
        &mut self,
        store: &mut SubmissionStore<S>,
        catalog: &Catalog,
        submitted_at: DateTime<Utc>,
    ) -> Result<Submission, SessionError> {
        let student = self.require(Role::Student)?.name.clone();
        let variant = self.selected_variant(catalog)?;

        let missing: Vec<u32> = variant
            .questions
            .iter()
            .map(|q| q.id)
            .filter(|id| !self.has_answer(*id))
            .collect();
        if !missing.is_empty() {
            return Err(SessionError::IncompleteAnswers { missing });
        }

        let submission = Submission::new(
            student,
            variant.id.clone(),
            std::mem::take(&mut self.draft),
            submitted_at,
        );
        store.record(submission.clone())?;

        self.selected_test = None;
        self.view = View::TestSelection;
        Ok(submission)
    }

    /// Grade as the logged-in teacher. Returns whether a submission matched.
    pub fn grade<S: Storage>(
        &self,
        store: &mut SubmissionStore<S>,
        student_name: &str,
        variant_id: &str,
        score: i32,
    ) -> Result<bool, SessionError> {
        let teacher = self.require(Role::Teacher)?;
        Ok(store.grade(student_name.trim(), variant_id, score, &teacher.name)?)
    }

    /// Grant a retake as the logged-in teacher. Returns whether a submission
    /// matched.
    pub fn allow_retake<S: Storage>(
        &self,
        store: &mut SubmissionStore<S>,
        student_name: &str,
        variant_id: &str,
    ) -> Result<bool, SessionError> {
        self.require(Role::Teacher)?;
        Ok(store.allow_retake(student_name.trim(), variant_id)?)
    }

    fn require(&self, role: Role) -> Result<&User, SessionError> {
        match &self.user {
            None => Err(SessionError::NotLoggedIn),
            Some(user) if user.role != role => Err(SessionError::Forbidden { required: role }),
            Some(user) => Ok(user),
        }
    }

    fn selected_variant<'c>(&self, catalog: &'c Catalog) -> Result<&'c TestVariant, SessionError> {
        let id = self
            .selected_test
            .as_deref()
            .ok_or(SessionError::NoTestSelected)?;
        catalog
            .get(id)
            .ok_or_else(|| SessionError::UnknownVariant(id.to_string()))
    }

    fn has_answer(&self, question_id: u32) -> bool {
        self.draft
            .get(&question_id)
            .is_some_and(|a| !a.trim().is_empty())
    }
}
