use futures::future::join_all;
use tracing::{info, warn};

use emis_role_core::AppResult;
use emis_role_domain::{Role, RoleId};

use super::RoleService;
use crate::role_ports::{RoleInput, RoleSeed};

/// Identity used to serialize seeds that target the same role.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SeedKey {
    Name(String),
    Id(RoleId),
    Anonymous,
}

impl SeedKey {
    fn of(input: &RoleInput) -> Self {
        match (input.trimmed_name(), input.id) {
            (Some(name), _) => Self::Name(name.to_owned()),
            (None, Some(role_id)) => Self::Id(role_id),
            (None, None) => Self::Anonymous,
        }
    }
}

impl RoleService {
    /// Reconciles the baseline role set against persisted state.
    ///
    /// The desired set is, in order: the administrator role, configured role
    /// names, `seeds`, and the optional seed document. Exact duplicates are
    /// dropped. Seeds for the same role are applied in order; distinct roles
    /// are upserted concurrently. Every role runs to completion before the
    /// first failure, in seeding order, is returned, so a failing seed never
    /// interrupts another role halfway through its writes.
    pub async fn seed<I, S>(&self, seeds: I) -> AppResult<Vec<Role>>
    where
        I: IntoIterator<Item = S>,
        S: Into<RoleSeed>,
    {
        let explicit = seeds.into_iter().map(Into::into).collect::<Vec<_>>();
        let desired = self.desired_roles(explicit).await;
        let groups = group_by_role(desired);

        let seeded = join_all(groups.into_iter().map(|group| self.upsert_in_order(group)))
            .await
            .into_iter()
            .collect::<AppResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        info!(count = seeded.len(), "seeded roles");
        Ok(seeded)
    }

    async fn desired_roles(&self, explicit: Vec<RoleSeed>) -> Vec<RoleInput> {
        let mut names: Vec<&str> = Vec::with_capacity(self.settings.role_seeds.len() + 1);
        for name in std::iter::once(self.settings.administrator_role_name.as_str())
            .chain(self.settings.role_seeds.iter().map(String::as_str))
            .map(str::trim)
        {
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }

        let mut desired = names.into_iter().map(RoleInput::named).collect::<Vec<_>>();
        desired.extend(explicit.into_iter().filter_map(RoleSeed::into_input));
        desired.extend(
            self.load_seed_document()
                .await
                .into_iter()
                .filter_map(RoleSeed::into_input),
        );

        let mut unique: Vec<RoleInput> = Vec::with_capacity(desired.len());
        for input in desired {
            if !unique.contains(&input) {
                unique.push(input);
            }
        }

        unique
    }

    async fn load_seed_document(&self) -> Vec<RoleSeed> {
        match self.seed_source.load_role_seeds().await {
            Ok(seeds) => seeds,
            Err(error) => {
                warn!(%error, "ignoring unreadable role seed document");
                Vec::new()
            }
        }
    }

    async fn upsert_in_order(&self, group: Vec<RoleInput>) -> AppResult<Option<Role>> {
        let mut latest = None;
        for input in group {
            latest = Some(self.upsert(input).await?);
        }

        Ok(latest)
    }
}

fn group_by_role(inputs: Vec<RoleInput>) -> Vec<Vec<RoleInput>> {
    let mut groups: Vec<(SeedKey, Vec<RoleInput>)> = Vec::new();

    for input in inputs {
        let key = SeedKey::of(&input);
        let position = (key != SeedKey::Anonymous)
            .then(|| groups.iter().position(|(group_key, _)| group_key == &key))
            .flatten();

        match position {
            Some(index) => groups[index].1.push(input),
            None => groups.push((key, vec![input])),
        }
    }

    groups.into_iter().map(|(_, group)| group).collect()
}
