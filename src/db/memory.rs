use crate::types::{
    ActivityRecord, AiReviewResult, AppError, BasicInfo, Certification, CertificationRecord,
    ChatRecord, Contributor, EnterpriseInfo, Material, MaterialFilter, MaterialStatistics,
    MaterialStatus, MenuItem, MenuMeta, MessageRecord, OperationLogRecord, PolicyList,
    PolicyQuery, PolicyRecord, ProfileBasic, ProjectRecord, Result, Role, ServiceRecord,
    TeamRecord, UploadMaterialRequest, UserInfo,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

const DEFAULT_PAGE_SIZE: usize = 10;

/// Process-local business data. Seeded on construction, lost on restart.
pub struct MockStore {
    profiles: HashMap<String, UserInfo>,
    basic_info: RwLock<HashMap<String, BasicInfo>>,
    projects: Vec<ProjectRecord>,
    teams: Vec<TeamRecord>,
    activities: Vec<ActivityRecord>,
    certification: Certification,
    profile_basic: ProfileBasic,
    operation_logs: Vec<OperationLogRecord>,
    menus: Vec<MenuItem>,
    messages: RwLock<Vec<MessageRecord>>,
    chats: Vec<ChatRecord>,
    materials: RwLock<Vec<Material>>,
    policies: Vec<PolicyRecord>,
    inspections: Vec<ServiceRecord>,
    services: Vec<ServiceRecord>,
    rules_presets: Vec<ServiceRecord>,
}

impl MockStore {
    pub fn seeded() -> Self {
        Self {
            profiles: seed_profiles(),
            basic_info: RwLock::new(HashMap::new()),
            projects: seed_projects(),
            teams: seed_teams(),
            activities: seed_activities(),
            certification: seed_certification(),
            profile_basic: seed_profile_basic(),
            operation_logs: seed_operation_logs(),
            menus: seed_menus(),
            messages: RwLock::new(seed_messages()),
            chats: seed_chats(),
            materials: RwLock::new(seed_materials()),
            policies: seed_policies(),
            inspections: seed_inspections(),
            services: seed_services(),
            rules_presets: seed_rules_presets(),
        }
    }

    // ============= User Center =============

    pub fn user_info(&self, username: &str) -> Option<UserInfo> {
        self.profiles.get(username).cloned()
    }

    pub fn projects(&self) -> Vec<ProjectRecord> {
        self.projects.clone()
    }

    pub fn teams(&self) -> Vec<TeamRecord> {
        self.teams.clone()
    }

    pub fn latest_activities(&self) -> Vec<ActivityRecord> {
        self.activities.clone()
    }

    pub fn certification(&self) -> Certification {
        self.certification.clone()
    }

    /// Replaces the caller's basic settings.
    pub fn save_basic_info(&self, username: &str, info: BasicInfo) {
        self.basic_info.write().insert(username.to_string(), info);
    }

    pub fn basic_info(&self, username: &str) -> Option<BasicInfo> {
        self.basic_info.read().get(username).cloned()
    }

    // ============= Profile =============

    pub fn profile_basic(&self) -> ProfileBasic {
        self.profile_basic.clone()
    }

    pub fn operation_logs(&self) -> Vec<OperationLogRecord> {
        self.operation_logs.clone()
    }

    /// Menu tree with entries the role may not see removed.
    pub fn menu_for(&self, role: &Role) -> Vec<MenuItem> {
        fn visible(item: &MenuItem, role: &Role) -> bool {
            item.meta
                .roles
                .as_ref()
                .is_none_or(|roles| roles.contains(role))
        }

        fn prune(items: &[MenuItem], role: &Role) -> Vec<MenuItem> {
            items
                .iter()
                .filter(|item| visible(item, role))
                .map(|item| MenuItem {
                    children: prune(&item.children, role),
                    ..item.clone()
                })
                .collect()
        }

        prune(&self.menus, role)
    }

    // ============= Messages =============

    pub fn messages(&self) -> Vec<MessageRecord> {
        self.messages.read().clone()
    }

    /// Marks the given ids read and returns the full list.
    pub fn mark_read(&self, ids: &[u64]) -> Vec<MessageRecord> {
        let mut messages = self.messages.write();
        for message in messages.iter_mut().filter(|m| ids.contains(&m.id)) {
            message.status = 1;
        }
        messages.clone()
    }

    pub fn chats(&self) -> Vec<ChatRecord> {
        self.chats.clone()
    }

    // ============= Materials =============

    pub fn materials(&self, filter: &MaterialFilter) -> Vec<Material> {
        self.materials
            .read()
            .iter()
            .filter(|m| filter.status.is_none_or(|s| m.status == s))
            .filter(|m| filter.category.as_ref().is_none_or(|c| &m.category == c))
            .filter(|m| filter.uploader.as_ref().is_none_or(|u| &m.uploader == u))
            .cloned()
            .collect()
    }

    pub fn material(&self, id: &str) -> Option<Material> {
        self.materials.read().iter().find(|m| m.id == id).cloned()
    }

    pub fn add_material(&self, request: UploadMaterialRequest, uploader: &str) -> Material {
        let id = uuid::Uuid::new_v4().to_string();
        let file_ref = request
            .files
            .first()
            .cloned()
            .unwrap_or_else(|| "default".to_string());

        let material = Material {
            file_url: format!("/files/{}", file_ref),
            file_name: format!("material-{}", &id[..8]),
            // Filled in by the file storage collaborator
            file_size: 0,
            id,
            title: request.title,
            description: request.description,
            category: request.category,
            tags: request.tags,
            status: MaterialStatus::Pending,
            uploader: uploader.to_string(),
            upload_time: Utc::now(),
            reviewer: None,
            review_time: None,
            review_comment: None,
            ai_review_result: None,
        };

        self.materials.write().push(material.clone());
        material
    }

    /// Records a review decision. `None` when the id is unknown.
    pub fn review(
        &self,
        id: &str,
        status: MaterialStatus,
        reviewer: &str,
        comment: Option<String>,
    ) -> Option<Material> {
        let mut materials = self.materials.write();
        let material = materials.iter_mut().find(|m| m.id == id)?;

        material.status = status;
        material.reviewer = Some(reviewer.to_string());
        material.review_time = Some(Utc::now());
        material.review_comment = comment;

        Some(material.clone())
    }

    /// Reviews every known id; unknown ids are skipped.
    pub fn batch_review(
        &self,
        ids: &[String],
        status: MaterialStatus,
        reviewer: &str,
        comment: Option<String>,
    ) -> Vec<Material> {
        ids.iter()
            .filter_map(|id| self.review(id, status, reviewer, comment.clone()))
            .collect()
    }

    /// Removes a material on behalf of `requester`. Only the uploader or an
    /// admin may delete; the check and the removal share one write lock.
    pub fn delete_material(&self, id: &str, requester: &str, role: &Role) -> Result<Material> {
        let mut materials = self.materials.write();
        let index = materials
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Material '{}'", id)))?;

        if materials[index].uploader != requester && *role != Role::Admin {
            return Err(AppError::Forbidden(
                "Only the uploader or an admin may delete this material".to_string(),
            ));
        }

        Ok(materials.remove(index))
    }

    /// Scores a material and attaches the result. `None` when the id is
    /// unknown.
    pub fn ai_review(&self, id: &str) -> Option<AiReviewResult> {
        let mut materials = self.materials.write();
        let material = materials.iter_mut().find(|m| m.id == id)?;

        let result = score_material(material);
        material.ai_review_result = Some(result.clone());
        Some(result)
    }

    pub fn statistics(&self) -> MaterialStatistics {
        let materials = self.materials.read();
        let count = |status| materials.iter().filter(|m| m.status == status).count();

        let mut by_category = BTreeMap::new();
        for material in materials.iter() {
            *by_category.entry(material.category.clone()).or_insert(0) += 1;
        }

        MaterialStatistics {
            total: materials.len(),
            pending: count(MaterialStatus::Pending),
            approved: count(MaterialStatus::Approved),
            rejected: count(MaterialStatus::Rejected),
            by_category,
        }
    }

    // ============= Lists =============

    /// Filters, then paginates. `total` counts the filtered set.
    pub fn policies(&self, query: &PolicyQuery) -> PolicyList {
        let name = query.name.as_ref().map(|n| n.to_lowercase());

        let filtered: Vec<&PolicyRecord> = self
            .policies
            .iter()
            .filter(|p| query.id.as_ref().is_none_or(|v| &p.id == v))
            .filter(|p| query.number.is_none_or(|v| p.number == v))
            .filter(|p| name.as_ref().is_none_or(|v| p.name.to_lowercase().contains(v)))
            .filter(|p| query.content_type.as_ref().is_none_or(|v| &p.content_type == v))
            .filter(|p| query.filter_type.as_ref().is_none_or(|v| &p.filter_type == v))
            .filter(|p| query.count.is_none_or(|v| p.count == v))
            .filter(|p| query.status.as_ref().is_none_or(|v| &p.status == v))
            .filter(|p| query.created_time.as_ref().is_none_or(|v| &p.created_time == v))
            .collect();

        let page = query.current.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let start = (page - 1).saturating_mul(page_size);

        PolicyList {
            total: filtered.len(),
            list: filtered
                .into_iter()
                .skip(start)
                .take(page_size)
                .cloned()
                .collect(),
        }
    }

    pub fn quality_inspections(&self) -> Vec<ServiceRecord> {
        self.inspections.clone()
    }

    pub fn services(&self) -> Vec<ServiceRecord> {
        self.services.clone()
    }

    pub fn rules_presets(&self) -> Vec<ServiceRecord> {
        self.rules_presets.clone()
    }
}

/// Heuristic stand-in for the model-backed reviewer: rewards a description
/// and tags, and flags materials with neither as medium risk.
fn score_material(material: &Material) -> AiReviewResult {
    let mut score: u8 = 60;
    let mut suggestions = Vec::new();

    if material.description.trim().is_empty() {
        suggestions.push("Add a description".to_string());
    } else {
        score += 20;
    }
    if material.tags.is_empty() {
        suggestions.push("Add tags to aid search".to_string());
    } else {
        score += 10;
    }
    if suggestions.is_empty() {
        suggestions.push("Content looks complete".to_string());
    }

    AiReviewResult {
        score,
        confidence: 85,
        suggestions,
        risk_level: if score >= 70 { "low" } else { "medium" }.to_string(),
    }
}

// ============= Seed Data =============

fn seed_profiles() -> HashMap<String, UserInfo> {
    let avatar = "https://i.gtimg.cn/club/item/face/img/2/15922_100.gif";
    let profile = |name: &str,
                   email: &str,
                   job: (&str, &str),
                   org: (&str, &str),
                   location: (&str, &str),
                   intro: &str,
                   site: &str,
                   phone: &str,
                   registered: &str,
                   account: &str,
                   certification: u8,
                   role: Role| UserInfo {
        name: name.to_string(),
        avatar: avatar.to_string(),
        email: email.to_string(),
        job: job.0.to_string(),
        job_name: job.1.to_string(),
        organization: org.0.to_string(),
        organization_name: org.1.to_string(),
        location: location.0.to_string(),
        location_name: location.1.to_string(),
        introduction: intro.to_string(),
        personal_website: site.to_string(),
        phone: phone.to_string(),
        registration_date: registered.to_string(),
        account_id: account.to_string(),
        certification,
        role,
    };

    HashMap::from([
        (
            "admin".to_string(),
            profile(
                "Wang Liqun",
                "wangliqun@email.com",
                ("frontend", "Frontend Engineer"),
                ("Frontend", "Frontend"),
                ("beijing", "Beijing"),
                "Easygoing and warm",
                "https://www.arco.design",
                "150****0000",
                "2013-05-10 12:10:00",
                "15012312300",
                1,
                Role::Admin,
            ),
        ),
        (
            "user".to_string(),
            profile(
                "Regular User",
                "user@example.com",
                ("user", "Regular User"),
                ("User", "Users"),
                ("shanghai", "Shanghai"),
                "A regular account",
                "https://example.com",
                "150****0001",
                "2023-01-01 10:00:00",
                "15012312301",
                0,
                Role::User,
            ),
        ),
        (
            "reviewer".to_string(),
            profile(
                "Reviewer",
                "reviewer@example.com",
                ("reviewer", "Content Reviewer"),
                ("Review", "Review Team"),
                ("guangzhou", "Guangzhou"),
                "Professional content review",
                "https://review.example.com",
                "150****0002",
                "2022-06-15 09:30:00",
                "15012312302",
                1,
                Role::Reviewer,
            ),
        ),
    ])
}

fn seed_menus() -> Vec<MenuItem> {
    let leaf = |path: &str, name: &str, locale: &str, roles: Option<Vec<Role>>| MenuItem {
        path: path.to_string(),
        name: name.to_string(),
        meta: MenuMeta {
            locale: locale.to_string(),
            requires_auth: true,
            icon: None,
            order: None,
            roles,
        },
        children: Vec::new(),
    };

    vec![MenuItem {
        path: "/material".to_string(),
        name: "material".to_string(),
        meta: MenuMeta {
            locale: "menu.material".to_string(),
            requires_auth: true,
            icon: Some("icon-file".to_string()),
            order: Some(1),
            roles: None,
        },
        children: vec![
            leaf("upload", "MaterialUpload", "menu.material.upload", None),
            leaf("list", "MaterialList", "menu.material.list", None),
            leaf(
                "review",
                "MaterialReview",
                "menu.material.review",
                Some(vec![Role::Admin, Role::Reviewer]),
            ),
            leaf(
                "statistics",
                "MaterialStatistics",
                "menu.material.statistics",
                Some(vec![Role::Admin]),
            ),
        ],
    }]
}

fn seed_messages() -> Vec<MessageRecord> {
    vec![
        MessageRecord {
            id: 1,
            kind: "notification".to_string(),
            title: "System notice".to_string(),
            sub_title: "New release".to_string(),
            avatar: Some("https://example.com/avatar.png".to_string()),
            content: "The system has been upgraded to v2.0 with several new features".to_string(),
            time: "2024-01-15 10:30:00".to_string(),
            status: 0,
            message_type: Some(1),
        },
        MessageRecord {
            id: 2,
            kind: "message".to_string(),
            title: "User message".to_string(),
            sub_title: "Zhang San".to_string(),
            avatar: Some("https://example.com/avatar2.png".to_string()),
            content: "Hello, I have a question".to_string(),
            time: "2024-01-14 15:20:00".to_string(),
            status: 1,
            message_type: Some(2),
        },
        MessageRecord {
            id: 3,
            kind: "alert".to_string(),
            title: "Security reminder".to_string(),
            sub_title: "Important".to_string(),
            avatar: Some("https://example.com/alert.png".to_string()),
            content: "Please update your password to keep your account safe".to_string(),
            time: "2024-01-13 09:00:00".to_string(),
            status: 0,
            message_type: Some(3),
        },
    ]
}

fn seed_chats() -> Vec<ChatRecord> {
    [
        (1, "Zhang San", "Hi, how is the project going?", "2024-01-15 14:30:00", false),
        (2, "Li Si", "Need a hand reviewing the materials?", "2024-01-15 13:45:00", true),
        (3, "Wang Wu", "The meeting is tomorrow at 3pm", "2024-01-15 12:20:00", false),
    ]
    .into_iter()
    .map(|(id, username, content, time, is_collect)| ChatRecord {
        id,
        username: username.to_string(),
        content: content.to_string(),
        time: time.to_string(),
        is_collect,
    })
    .collect()
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn seed_materials() -> Vec<Material> {
    vec![
        Material {
            id: "1".to_string(),
            title: "Project document".to_string(),
            description: "Detailed project description".to_string(),
            category: "document".to_string(),
            tags: vec!["project".into(), "document".into(), "description".into()],
            file_url: "/files/project-doc.pdf".to_string(),
            file_name: "project-doc.pdf".to_string(),
            file_size: 1_024_000,
            status: MaterialStatus::Approved,
            uploader: "admin".to_string(),
            upload_time: at(2024, 1, 15, 10, 30),
            reviewer: Some("reviewer".to_string()),
            review_time: Some(at(2024, 1, 16, 14, 20)),
            review_comment: Some("Complete and meets requirements".to_string()),
            ai_review_result: Some(AiReviewResult {
                score: 85,
                confidence: 90,
                suggestions: vec![
                    "Formatting could be improved".to_string(),
                    "Consider adding a table of contents".to_string(),
                ],
                risk_level: "low".to_string(),
            }),
        },
        Material {
            id: "2".to_string(),
            title: "Design draft".to_string(),
            description: "First UI design draft".to_string(),
            category: "design".to_string(),
            tags: vec!["UI".into(), "design".into(), "draft".into()],
            file_url: "/files/design-draft.png".to_string(),
            file_name: "design-draft.png".to_string(),
            file_size: 2_048_000,
            status: MaterialStatus::Pending,
            uploader: "user".to_string(),
            upload_time: at(2024, 1, 20, 9, 15),
            reviewer: None,
            review_time: None,
            review_comment: None,
            ai_review_result: None,
        },
    ]
}

fn seed_policies() -> Vec<PolicyRecord> {
    [
        ("1", 1001, "Image review policy", "img", "artificial", 150, "online", "2024-01-10"),
        ("2", 1002, "Video review policy", "horizontalVideo", "rules", 89, "offline", "2024-01-12"),
        ("3", 1003, "Content filter policy", "verticalVideo", "artificial", 203, "online", "2024-01-14"),
        ("4", 1004, "Comment screening policy", "img", "rules", 57, "online", "2024-01-16"),
    ]
    .into_iter()
    .map(
        |(id, number, name, content_type, filter_type, count, status, created)| PolicyRecord {
            id: id.to_string(),
            number,
            name: name.to_string(),
            content_type: content_type.to_string(),
            filter_type: filter_type.to_string(),
            count,
            status: status.to_string(),
            created_time: created.to_string(),
        },
    )
    .collect()
}

fn service_list(entries: &[(u64, &str, &str, &str, &str, &str)]) -> Vec<ServiceRecord> {
    entries
        .iter()
        .map(|&(id, title, description, name, action, icon)| ServiceRecord {
            id,
            title: title.to_string(),
            description: description.to_string(),
            name: Some(name.to_string()),
            action_type: Some(action.to_string()),
            icon: Some(icon.to_string()),
            enable: None,
            expires: None,
        })
        .collect()
}

fn seed_inspections() -> Vec<ServiceRecord> {
    service_list(&[
        (1, "Content quality check", "Checks content quality and completeness", "quality-inspection", "view", "check-circle"),
        (2, "Security review", "Security checks and policies", "security-check", "edit", "shield"),
    ])
}

fn seed_services() -> Vec<ServiceRecord> {
    service_list(&[
        (1, "User service", "User-facing service features", "user-service", "manage", "user"),
        (2, "System service", "System administration and maintenance", "system-service", "config", "setting"),
    ])
}

fn seed_rules_presets() -> Vec<ServiceRecord> {
    service_list(&[
        (1, "Basic rule set", "Baseline content review rules", "basic-rules", "apply", "file-text"),
        (2, "Advanced rule set", "Advanced content filtering rules", "advanced-rules", "customize", "filter"),
    ])
}

fn seed_projects() -> Vec<ProjectRecord> {
    let avatar = "//p1-arco.byteimg.com/tos-cn-i-uwbnlip3yd/a8c8cdb109cb051163646151a4a5083b.png~tplv-uwbnlip3yd-webp.webp";
    let contributor = |name: &str, email: &str, avatar: &str| Contributor {
        name: name.to_string(),
        email: email.to_string(),
        avatar: avatar.to_string(),
    };

    vec![
        ProjectRecord {
            id: 1,
            name: "HCI BGA project".to_string(),
            description: "Human-computer interaction material review platform".to_string(),
            people_number: 456,
            contributors: vec![
                contributor("Qin Zhenyu", "qingzhenyu@arco.design", avatar),
                contributor("Yu Tao", "yuebao@arco.design", avatar),
            ],
        },
        ProjectRecord {
            id: 2,
            name: "Smart review system".to_string(),
            description: "AI-assisted content review".to_string(),
            people_number: 3,
            contributors: vec![contributor(
                "Wang Wu",
                "wangwu@example.com",
                "https://example.com/avatar3.png",
            )],
        },
    ]
}

fn seed_teams() -> Vec<TeamRecord> {
    [
        (1, "https://example.com/team1.png", "Frontend team", 8),
        (2, "https://example.com/team2.png", "Backend team", 6),
    ]
    .into_iter()
    .map(|(id, avatar, name, people_number)| TeamRecord {
        id,
        avatar: avatar.to_string(),
        name: name.to_string(),
        people_number,
    })
    .collect()
}

fn seed_activities() -> Vec<ActivityRecord> {
    [
        (1, "Project kickoff", "Held the kickoff meeting to plan the work", "https://example.com/activity1.png"),
        (2, "System upgrade complete", "Deployed the v2.0 upgrade", "https://example.com/activity2.png"),
    ]
    .into_iter()
    .map(|(id, title, description, avatar)| ActivityRecord {
        id,
        title: title.to_string(),
        description: description.to_string(),
        avatar: avatar.to_string(),
    })
    .collect()
}

fn seed_certification() -> Certification {
    Certification {
        enterprise_info: EnterpriseInfo {
            account_type: 1,
            status: 2,
            time: "2024-01-10".to_string(),
            legal_person: "Zhang San".to_string(),
            certificate_type: "Business license".to_string(),
            authentication_number: "CERT123456".to_string(),
            enterprise_name: "Example Technology Co., Ltd.".to_string(),
        },
        record: vec![
            CertificationRecord {
                certification_type: 1,
                certification_content: "Enterprise identity verification".to_string(),
                status: 2,
                time: "2024-01-10".to_string(),
            },
            CertificationRecord {
                certification_type: 2,
                certification_content: "Legal representative verification".to_string(),
                status: 2,
                time: "2024-01-11".to_string(),
            },
        ],
    }
}

fn seed_profile_basic() -> ProfileBasic {
    ProfileBasic {
        status: 200,
        video: json!({
            "mode": "custom",
            "acquisition": { "resolution": "1280x720", "frameRate": 30 },
            "encoding": {
                "resolution": "1280x720",
                "rate": { "min": 300, "max": 2000, "default": 1500 },
                "frameRate": 30,
                "profile": "high"
            }
        }),
        audio: json!({
            "mode": "custom",
            "acquisition": { "channels": 2 },
            "encoding": { "channels": 2, "rate": 44100, "profile": "aac_low" }
        }),
    }
}

fn seed_operation_logs() -> Vec<OperationLogRecord> {
    [
        ("1", "CONT001", "Updated profile details", "2024-01-15 14:30:00"),
        ("2", "CONT002", "Uploaded a new material file", "2024-01-14 10:15:00"),
        ("3", "CONT003", "Reviewed a submitted material", "2024-01-13 16:45:00"),
    ]
    .into_iter()
    .map(|(key, number, content, time)| OperationLogRecord {
        key: key.to_string(),
        content_number: number.to_string(),
        update_content: content.to_string(),
        status: 1,
        update_time: time.to_string(),
    })
    .collect()
}
