use async_trait::async_trait;
use chrono::Utc;
use ong_portal::models::{
    CreateMemberRequest, Member, NewSlide, NewUser, Organization, Role, Slide,
    UpdateMemberRequest, User,
};
use ong_portal::repository::Repository;
use std::sync::Mutex;
use uuid::Uuid;

/// MockRepo
///
/// In-memory Repository implementation backing the handler and service tests.
/// Each table is a Mutex-guarded Vec so tests can seed state up front and
/// assert on what was (or was not) persisted afterwards.
#[derive(Default)]
pub struct MockRepo {
    pub members: Mutex<Vec<Member>>,
    pub slides: Mutex<Vec<Slide>>,
    pub organizations: Mutex<Vec<Organization>>,
    pub users: Mutex<Vec<User>>,
    pub roles: Mutex<Vec<Role>>,
}

impl MockRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an organization and returns its id.
    pub fn seed_organization(&self, name: &str) -> Uuid {
        let org = Organization {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            image: None,
        };
        let id = org.id;
        self.organizations.lock().unwrap().push(org);
        id
    }

    /// Seeds a slide with a fixed display order.
    pub fn seed_slide(&self, organization_id: Uuid, organization_order: i32) -> Uuid {
        let slide = Slide {
            id: Uuid::new_v4(),
            organization_id,
            image_url: format!("http://localhost:9000/mock-bucket/seed-{organization_order}.jpg"),
            text: None,
            organization_order,
            created_at: Utc::now(),
        };
        let id = slide.id;
        self.slides.lock().unwrap().push(slide);
        id
    }

    /// Seeds a user with the given role name and returns their id. The stored
    /// password is an argon2 hash of `password`.
    pub fn seed_user(&self, email: &str, password: &str, role: &str) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: ong_portal::services::hash_password(password).unwrap(),
            role: role.to_string(),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.users.lock().unwrap().push(user);
        id
    }

    /// Seeds the static reference role table entry.
    pub fn seed_role(&self, id: i32, name: &str) {
        self.roles.lock().unwrap().push(Role {
            id,
            name: name.to_string(),
            description: None,
            creation_date: Utc::now(),
        });
    }

    /// Seeds `count` bare members, for pagination tests.
    pub fn seed_members(&self, count: usize) {
        let mut members = self.members.lock().unwrap();
        for i in 0..count {
            members.push(Member {
                id: Uuid::new_v4(),
                name: format!("Member {i}"),
                created_at: Utc::now(),
                updated_at: Utc::now(),
                ..Member::default()
            });
        }
    }
}

#[async_trait]
impl Repository for MockRepo {
    async fn list_members(&self, limit: i64, offset: i64) -> Vec<Member> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect()
    }

    async fn count_members(&self) -> i64 {
        self.members.lock().unwrap().len() as i64
    }

    async fn create_member(&self, req: CreateMemberRequest) -> Option<Member> {
        let member = Member {
            id: Uuid::new_v4(),
            name: req.name,
            facebook_url: req.facebook_url,
            instagram_url: req.instagram_url,
            linkedin_url: req.linkedin_url,
            image: req.image,
            description: req.description,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.members.lock().unwrap().push(member.clone());
        Some(member)
    }

    async fn update_member(&self, id: Uuid, req: UpdateMemberRequest) -> Option<Member> {
        let mut members = self.members.lock().unwrap();
        let member = members.iter_mut().find(|m| m.id == id)?;
        if let Some(name) = req.name {
            member.name = name;
        }
        if let Some(facebook_url) = req.facebook_url {
            member.facebook_url = Some(facebook_url);
        }
        if let Some(instagram_url) = req.instagram_url {
            member.instagram_url = Some(instagram_url);
        }
        if let Some(linkedin_url) = req.linkedin_url {
            member.linkedin_url = Some(linkedin_url);
        }
        if let Some(image) = req.image {
            member.image = Some(image);
        }
        if let Some(description) = req.description {
            member.description = Some(description);
        }
        member.updated_at = Utc::now();
        Some(member.clone())
    }

    async fn delete_member(&self, id: Uuid) -> bool {
        let mut members = self.members.lock().unwrap();
        let before = members.len();
        members.retain(|m| m.id != id);
        members.len() < before
    }

    async fn get_slide(&self, id: Uuid) -> Option<Slide> {
        self.slides
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    async fn get_organization_slides(&self, organization_id: Uuid) -> Vec<Slide> {
        let mut slides: Vec<Slide> = self
            .slides
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.organization_id == organization_id)
            .cloned()
            .collect();
        slides.sort_by_key(|s| s.organization_order);
        slides
    }

    async fn max_slide_order(&self, organization_id: Uuid) -> Option<i32> {
        self.slides
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.organization_id == organization_id)
            .map(|s| s.organization_order)
            .max()
    }

    async fn create_slide(&self, slide: NewSlide) -> Option<Slide> {
        let slide = Slide {
            id: Uuid::new_v4(),
            organization_id: slide.organization_id,
            image_url: slide.image_url,
            text: slide.text,
            organization_order: slide.organization_order,
            created_at: Utc::now(),
        };
        self.slides.lock().unwrap().push(slide.clone());
        Some(slide)
    }

    async fn delete_slide(&self, id: Uuid) -> bool {
        let mut slides = self.slides.lock().unwrap();
        let before = slides.len();
        slides.retain(|s| s.id != id);
        slides.len() < before
    }

    async fn get_organization(&self, id: Uuid) -> Option<Organization> {
        self.organizations
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    async fn get_user(&self, id: Uuid) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    async fn find_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    async fn create_user(&self, user: NewUser) -> Option<User> {
        // Mirror the SQL join: resolve the role name from the reference table.
        let role = self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == user.role_id)?
            .name
            .clone();

        let user = User {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password_hash,
            role,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Some(user)
    }

    async fn find_role_by_name(&self, name: &str) -> Option<Role> {
        self.roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.name == name)
            .cloned()
    }
}
