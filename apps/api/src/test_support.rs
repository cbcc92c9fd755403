//! Fakes and fixtures shared by unit and router tests.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{AuthError, ExternalIdentity, IdentityVerifier};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::job::{Job, JobChanges, NewJob};
use crate::models::resume::{NewResume, Resume, ResumeWithJob};
use crate::models::user::User;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::Store;
use crate::tailoring::{Tailor, TailorError, TailoringOutcome};

// ────────────────────────────────────────────────────────────────────────────
// Fixtures
// ────────────────────────────────────────────────────────────────────────────

pub fn identity(name: &str) -> ExternalIdentity {
    ExternalIdentity {
        id: format!("ext-{name}"),
        email: Some(format!("{name}@example.com")),
    }
}

pub fn sample_user() -> User {
    User {
        id: Uuid::new_v4(),
        external_id: format!("ext-{}", Uuid::new_v4()),
        email: "user@example.com".to_string(),
        created_at: Utc::now(),
    }
}

pub fn sample_job(user_id: Uuid) -> Job {
    Job {
        id: Uuid::new_v4(),
        user_id,
        title: "Engineer".to_string(),
        description: "Build things".to_string(),
        company: None,
        skills: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// A PDF with one page per entry, each page drawing its text in Courier.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// A DOCX whose body holds one paragraph per entry.
pub fn minimal_docx(paragraphs: &[&str]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;

    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );
    let content_types = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    writer.start_file("[Content_Types].xml", options).unwrap();
    writer.write_all(content_types.as_bytes()).unwrap();
    writer.start_file("word/document.xml", options).unwrap();
    writer.write_all(document.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory store
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    jobs: Vec<Job>,
    resumes: Vec<Resume>,
}

/// `Store` over plain vectors. Insertion order stands in for `created_at`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store poisoned")
    }

    pub fn resume_count(&self) -> usize {
        self.tables().resumes.len()
    }

    pub fn job_count(&self) -> usize {
        self.tables().jobs.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn upsert_user(&self, external_id: &str, email: &str) -> Result<User, AppError> {
        let mut tables = self.tables();
        if let Some(user) = tables.users.iter_mut().find(|u| u.external_id == external_id) {
            user.email = email.to_string();
            return Ok(user.clone());
        }
        let user = User {
            id: Uuid::new_v4(),
            external_id: external_id.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_external_id(&self, external_id: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    async fn create_job(&self, user_id: Uuid, job: NewJob) -> Result<Job, AppError> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4(),
            user_id,
            title: job.title,
            description: job.description,
            company: job.company,
            skills: job.skills,
            created_at: now,
            updated_at: now,
        };
        self.tables().jobs.push(job.clone());
        Ok(job)
    }

    async fn list_jobs(&self, user_id: Uuid) -> Result<Vec<Job>, AppError> {
        Ok(self
            .tables()
            .jobs
            .iter()
            .rev()
            .filter(|j| j.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<Job>, AppError> {
        Ok(self.tables().jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn update_job(&self, job_id: Uuid, changes: JobChanges) -> Result<Option<Job>, AppError> {
        let mut tables = self.tables();
        let Some(job) = tables.jobs.iter_mut().find(|j| j.id == job_id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            job.title = title;
        }
        if let Some(description) = changes.description {
            job.description = description;
        }
        if let Some(company) = changes.company {
            job.company = company;
        }
        if let Some(skills) = changes.skills {
            job.skills = skills;
        }
        job.updated_at = Utc::now();
        Ok(Some(job.clone()))
    }

    async fn delete_job(&self, job_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables();
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != job_id);
        let deleted = tables.jobs.len() != before;
        if deleted {
            tables.resumes.retain(|r| r.job_id != job_id);
        }
        Ok(deleted)
    }

    async fn create_resume(&self, resume: NewResume) -> Result<Resume, AppError> {
        let now = Utc::now();
        let resume = Resume {
            id: Uuid::new_v4(),
            user_id: resume.user_id,
            job_id: resume.job_id,
            original: resume.original,
            tailored: None,
            analysis: None,
            file_name: resume.file_name,
            created_at: now,
            updated_at: now,
        };
        self.tables().resumes.push(resume.clone());
        Ok(resume)
    }

    async fn find_resume(&self, resume_id: Uuid) -> Result<Option<Resume>, AppError> {
        Ok(self
            .tables()
            .resumes
            .iter()
            .find(|r| r.id == resume_id)
            .cloned())
    }

    async fn find_resume_with_job(&self, resume_id: Uuid) -> Result<Option<ResumeWithJob>, AppError> {
        let tables = self.tables();
        Ok(tables.resumes.iter().find(|r| r.id == resume_id).map(|resume| {
            ResumeWithJob {
                resume: resume.clone(),
                job: tables.jobs.iter().find(|j| j.id == resume.job_id).cloned(),
            }
        }))
    }

    async fn list_resumes_for_job(&self, job_id: Uuid) -> Result<Vec<Resume>, AppError> {
        Ok(self
            .tables()
            .resumes
            .iter()
            .rev()
            .filter(|r| r.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn save_tailoring(
        &self,
        resume_id: Uuid,
        tailored: &str,
        analysis: &Value,
    ) -> Result<Option<Resume>, AppError> {
        let mut tables = self.tables();
        let Some(resume) = tables.resumes.iter_mut().find(|r| r.id == resume_id) else {
            return Ok(None);
        };
        resume.tailored = Some(tailored.to_string());
        resume.analysis = Some(analysis.clone());
        resume.updated_at = Utc::now();
        Ok(Some(resume.clone()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Identity and tailoring fakes
// ────────────────────────────────────────────────────────────────────────────

/// Accepts `token-<name>` for each registered name.
pub struct StaticVerifier {
    tokens: HashMap<String, ExternalIdentity>,
}

impl StaticVerifier {
    pub fn with_users(names: &[&str]) -> Self {
        Self {
            tokens: names
                .iter()
                .map(|name| (format!("token-{name}"), identity(name)))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn resolve(&self, token: &str) -> Result<ExternalIdentity, AuthError> {
        self.tokens.get(token).cloned().ok_or(AuthError::Rejected(401))
    }
}

type FailureFactory = Box<dyn Fn() -> TailorError + Send + Sync>;

/// Returns a fixed outcome (or error) and records every call.
pub struct ScriptedTailor {
    result: Result<TailoringOutcome, FailureFactory>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedTailor {
    pub fn succeeding(outcome: TailoringOutcome) -> Self {
        Self {
            result: Ok(outcome),
            calls: Mutex::default(),
        }
    }

    pub fn failing(make_error: impl Fn() -> TailorError + Send + Sync + 'static) -> Self {
        Self {
            result: Err(Box::new(make_error)),
            calls: Mutex::default(),
        }
    }

    /// `(job_description, resume_text)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls poisoned").clone()
    }
}

#[async_trait]
impl Tailor for ScriptedTailor {
    async fn tailor(
        &self,
        job_description: &str,
        resume_text: &str,
    ) -> Result<TailoringOutcome, TailorError> {
        self.calls
            .lock()
            .expect("calls poisoned")
            .push((job_description.to_string(), resume_text.to_string()));
        match &self.result {
            Ok(outcome) => Ok(outcome.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Router harness
// ────────────────────────────────────────────────────────────────────────────

/// Router wired to fakes; `alice` and `bob` hold valid tokens.
pub fn test_app(tailor: Option<Arc<dyn Tailor>>) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState {
        store: store.clone(),
        verifier: Arc::new(StaticVerifier::with_users(&["alice", "bob"])),
        tailor,
        config: Config::for_tests(),
    };
    (build_router(state), store)
}
