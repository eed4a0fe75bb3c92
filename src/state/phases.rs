//! Six-phase project lifecycle tracker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Completed,
    Active,
    Pending,
}

#[derive(Debug, Clone)]
pub struct PhaseTask {
    pub name: String,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct Phase {
    pub id: u32,
    pub name: String,
    pub status: PhaseStatus,
    pub progress: u8,
    pub tasks: Vec<PhaseTask>,
}

#[derive(Debug, Clone)]
pub struct PhaseProject {
    pub name: String,
    pub current_phase: u32,
    pub total_phases: u32,
    pub phases: Vec<Phase>,
}

impl PhaseProject {
    pub fn demo() -> Self {
        let names: [(&str, &[&str]); 6] = [
            ("Planning", &["Define requirements", "Choose tech stack"]),
            ("Design", &["Sketch interfaces", "Model data"]),
            ("Scaffolding", &["Generate project skeleton", "Wire configuration"]),
            ("Implementation", &["Build core features", "Integrate backend"]),
            ("Testing", &["Write test suite", "Fix regressions"]),
            ("Deployment", &["Provision target", "Ship release"]),
        ];

        let phases = names
            .iter()
            .enumerate()
            .map(|(index, (name, tasks))| Phase {
                id: index as u32 + 1,
                name: (*name).to_string(),
                status: PhaseStatus::Pending,
                progress: 0,
                tasks: tasks
                    .iter()
                    .map(|task| PhaseTask {
                        name: (*task).to_string(),
                        completed: false,
                    })
                    .collect(),
            })
            .collect();

        let mut project = Self {
            name: "MITO Project".to_string(),
            current_phase: 1,
            total_phases: 6,
            phases,
        };
        project.set_current_phase(2);
        project
    }

    /// Moves the tracker to `phase` (clamped to `1..=total_phases`) and
    /// restates every phase so that exactly one is `Active`, everything
    /// before it `Completed`, everything after it `Pending`.
    pub fn set_current_phase(&mut self, phase: u32) {
        self.current_phase = phase.clamp(1, self.total_phases);
        for entry in &mut self.phases {
            if entry.id < self.current_phase {
                entry.status = PhaseStatus::Completed;
                entry.progress = 100;
                for task in &mut entry.tasks {
                    task.completed = true;
                }
            } else if entry.id == self.current_phase {
                entry.status = PhaseStatus::Active;
            } else {
                entry.status = PhaseStatus::Pending;
                entry.progress = 0;
                for task in &mut entry.tasks {
                    task.completed = false;
                }
            }
        }
    }

    pub fn active_phase(&self) -> Option<&Phase> {
        self.phases
            .iter()
            .find(|phase| phase.status == PhaseStatus::Active)
    }

    /// Overall completion. Deliberately gives no credit for partial
    /// progress inside the active phase.
    pub fn overall_progress(&self) -> u8 {
        if self.total_phases == 0 {
            return 0;
        }
        let fraction = f64::from(self.current_phase - 1) / f64::from(self.total_phases);
        (fraction * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overall_progress_excludes_active_phase() {
        let mut project = PhaseProject::demo();
        project.set_current_phase(2);
        assert_eq!(project.total_phases, 6);
        assert_eq!(project.overall_progress(), 17);
    }

    #[test]
    fn exactly_one_phase_is_active() {
        let mut project = PhaseProject::demo();
        for target in 1..=6 {
            project.set_current_phase(target);
            let active: Vec<_> = project
                .phases
                .iter()
                .filter(|phase| phase.status == PhaseStatus::Active)
                .collect();
            assert_eq!(active.len(), 1);
            assert_eq!(active[0].id, target);
        }
    }

    #[test]
    fn phases_before_active_are_completed_and_after_pending() {
        let mut project = PhaseProject::demo();
        project.set_current_phase(4);
        for phase in &project.phases {
            match phase.id {
                id if id < 4 => {
                    assert_eq!(phase.status, PhaseStatus::Completed);
                    assert_eq!(phase.progress, 100);
                    assert!(phase.tasks.iter().all(|task| task.completed));
                }
                4 => assert_eq!(phase.status, PhaseStatus::Active),
                _ => {
                    assert_eq!(phase.status, PhaseStatus::Pending);
                    assert_eq!(phase.progress, 0);
                }
            }
        }
    }

    #[test]
    fn set_current_phase_clamps_out_of_range_targets() {
        let mut project = PhaseProject::demo();
        project.set_current_phase(0);
        assert_eq!(project.current_phase, 1);
        project.set_current_phase(99);
        assert_eq!(project.current_phase, 6);
    }
}
