use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, warn};

use super::{
    Component, ComponentId, ConfigurationError, Core, CoreId, SystemRecords, Task, TaskId,
};
use crate::time::{self, Duration};

/// A validated, immutable hierarchical system: tasks owned by
/// components, components owned by cores.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    tasks: Vec<Task>,
    components: Vec<Component>,
    cores: Vec<Core>,
}

fn require(
    ok: bool,
    kind: &'static str,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), ConfigurationError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter {
            kind,
            id: id.to_string(),
            field,
            value,
        })
    }
}

fn require_positive(
    kind: &'static str,
    id: &str,
    field: &'static str,
    value: f64,
) -> Result<(), ConfigurationError> {
    require(value.is_finite() && value > 0.0, kind, id, field, value)
}

/// Assign priorities to entities that lack an explicit one: they rank
/// after all explicitly prioritized siblings, rate-monotonically, with
/// ties broken by name.
fn resolve_priorities(declared: &[(Option<u32>, Duration, &str)]) -> Vec<u32> {
    let base = declared
        .iter()
        .filter_map(|(p, _, _)| *p)
        .max()
        .map_or(0, |max| max.saturating_add(1));
    let mut resolved: Vec<u32> = declared.iter().map(|(p, _, _)| p.unwrap_or(0)).collect();
    let unprioritized = declared
        .iter()
        .enumerate()
        .filter(|(_, (p, _, _))| p.is_none())
        .sorted_by(|(_, (_, pa, na)), (_, (_, pb, nb))| pa.total_cmp(pb).then_with(|| na.cmp(nb)));
    for (rank, (i, _)) in unprioritized.enumerate() {
        resolved[i] = base.saturating_add(rank as u32);
    }
    resolved
}

impl System {
    /// Validate the records and attach tasks to components and
    /// components to cores.
    pub fn from_records(records: &SystemRecords) -> Result<Self, ConfigurationError> {
        let mut core_ids: HashMap<&str, CoreId> = HashMap::new();
        for (i, rec) in records.cores.iter().enumerate() {
            require_positive("core", &rec.core_id, "speed_factor", rec.speed_factor)?;
            if core_ids.insert(rec.core_id.as_str(), CoreId(i)).is_some() {
                return Err(ConfigurationError::DuplicateId {
                    kind: "core",
                    id: rec.core_id.clone(),
                });
            }
        }

        let mut component_ids: HashMap<&str, ComponentId> = HashMap::new();
        let mut component_cores = Vec::with_capacity(records.components.len());
        for (i, rec) in records.components.iter().enumerate() {
            let id = rec.component_id.as_str();
            require_positive("component", id, "period", rec.period)?;
            require(
                rec.budget.is_finite() && rec.budget >= 0.0 && rec.budget <= rec.period,
                "component",
                id,
                "budget",
                rec.budget,
            )?;
            let core = *core_ids
                .get(rec.core_id.as_str())
                .ok_or_else(|| ConfigurationError::UnknownCore {
                    component: rec.component_id.clone(),
                    core: rec.core_id.clone(),
                })?;
            component_cores.push(core);
            if component_ids.insert(id, ComponentId(i)).is_some() {
                return Err(ConfigurationError::DuplicateId {
                    kind: "component",
                    id: rec.component_id.clone(),
                });
            }
        }

        let mut task_names: HashMap<&str, TaskId> = HashMap::new();
        let mut task_components = Vec::with_capacity(records.tasks.len());
        for (i, rec) in records.tasks.iter().enumerate() {
            let id = rec.task_name.as_str();
            require(
                rec.wcet.is_finite() && rec.wcet >= 0.0,
                "task",
                id,
                "wcet",
                rec.wcet,
            )?;
            let bcet = rec.bcet.unwrap_or(rec.wcet);
            require(
                bcet.is_finite() && bcet >= 0.0 && bcet <= rec.wcet,
                "task",
                id,
                "bcet",
                bcet,
            )?;
            require_positive("task", id, "period", rec.period)?;
            let deadline = rec.deadline.unwrap_or(rec.period);
            require(
                deadline.is_finite() && deadline > 0.0 && deadline <= rec.period,
                "task",
                id,
                "deadline",
                deadline,
            )?;
            let component = *component_ids
                .get(rec.component_id.as_str())
                .ok_or_else(|| ConfigurationError::UnknownComponent {
                    task: rec.task_name.clone(),
                    component: rec.component_id.clone(),
                })?;
            task_components.push(component);
            if task_names.insert(id, TaskId(i)).is_some() {
                return Err(ConfigurationError::DuplicateId {
                    kind: "task",
                    id: rec.task_name.clone(),
                });
            }
        }

        // Ownership: component -> tasks, core -> components.
        let mut owned_tasks: Vec<Vec<TaskId>> = vec![Vec::new(); records.components.len()];
        for (i, component) in task_components.iter().enumerate() {
            owned_tasks[component.index()].push(TaskId(i));
        }
        let mut owned_components: Vec<Vec<ComponentId>> = vec![Vec::new(); records.cores.len()];
        for (i, core) in component_cores.iter().enumerate() {
            owned_components[core.index()].push(ComponentId(i));
        }

        // Resolve task priorities per component.
        let mut task_priorities = vec![0u32; records.tasks.len()];
        for tasks in &owned_tasks {
            let declared: Vec<_> = tasks
                .iter()
                .map(|t| {
                    let rec = &records.tasks[t.index()];
                    (rec.priority, rec.period, rec.task_name.as_str())
                })
                .collect();
            for (t, p) in tasks.iter().zip(resolve_priorities(&declared)) {
                task_priorities[t.index()] = p;
            }
        }

        // Resolve component priorities per core.
        let mut component_priorities = vec![0u32; records.components.len()];
        for components in &owned_components {
            let declared: Vec<_> = components
                .iter()
                .map(|c| {
                    let rec = &records.components[c.index()];
                    (rec.priority, rec.period, rec.component_id.as_str())
                })
                .collect();
            for (c, p) in components.iter().zip(resolve_priorities(&declared)) {
                component_priorities[c.index()] = p;
            }
        }

        let tasks: Vec<Task> = records
            .tasks
            .iter()
            .enumerate()
            .map(|(i, rec)| Task {
                name: rec.task_name.clone(),
                bcet: rec.bcet.unwrap_or(rec.wcet),
                wcet: rec.wcet,
                period: rec.period,
                deadline: rec.deadline.unwrap_or(rec.period),
                priority: task_priorities[i],
                component: task_components[i],
            })
            .collect();

        let mut components = Vec::with_capacity(records.components.len());
        for (i, (rec, owned)) in records.components.iter().zip(owned_tasks).enumerate() {
            let hyperperiod = time::hyperperiod(owned.iter().map(|t| tasks[t.index()].period));
            components.push(Component {
                name: rec.component_id.clone(),
                policy: rec.scheduler,
                budget: rec.budget,
                period: rec.period,
                delay: rec.period - rec.budget,
                core: component_cores[i],
                priority: component_priorities[i],
                tasks: owned,
                hyperperiod,
            });
        }

        let mut cores = Vec::with_capacity(records.cores.len());
        for (rec, owned) in records.cores.iter().zip(owned_components) {
            let hyperperiod = time::hyperperiod(
                owned
                    .iter()
                    .flat_map(|c| components[c.index()].tasks.iter())
                    .map(|t| tasks[t.index()].period),
            );
            let server_hyperperiod =
                time::hyperperiod(owned.iter().map(|c| components[c.index()].period));
            if hyperperiod.is_none() || server_hyperperiod.is_none() {
                warn!(core = %rec.core_id, "hyperperiod not representable");
            }
            cores.push(Core {
                name: rec.core_id.clone(),
                speed_factor: rec.speed_factor,
                policy: rec.scheduler,
                components: owned,
                hyperperiod,
                server_hyperperiod,
            });
        }

        debug!(
            tasks = tasks.len(),
            components = components.len(),
            cores = cores.len(),
            "system constructed"
        );

        Ok(System {
            tasks,
            components,
            cores,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn cores(&self) -> &[Core] {
        &self.cores
    }

    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.index()]
    }

    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.index()]
    }

    pub fn core(&self, id: CoreId) -> &Core {
        &self.cores[id.index()]
    }

    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> {
        (0..self.tasks.len()).map(TaskId)
    }

    pub fn component_ids(&self) -> impl Iterator<Item = ComponentId> {
        (0..self.components.len()).map(ComponentId)
    }

    pub fn core_ids(&self) -> impl Iterator<Item = CoreId> {
        (0..self.cores.len()).map(CoreId)
    }

    /// Look up a task by its configured name.
    pub fn task_by_name(&self, name: &str) -> Option<TaskId> {
        self.tasks.iter().position(|t| t.name == name).map(TaskId)
    }

    /// Look up a component by its configured identifier.
    pub fn component_by_name(&self, name: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .position(|c| c.name == name)
            .map(ComponentId)
    }

    /// Look up a core by its configured identifier.
    pub fn core_by_name(&self, name: &str) -> Option<CoreId> {
        self.cores.iter().position(|c| c.name == name).map(CoreId)
    }

    /// The speed factor of the core hosting the given component.
    pub fn speed_of(&self, component: ComponentId) -> f64 {
        self.core(self.component(component).core).speed_factor
    }
}
