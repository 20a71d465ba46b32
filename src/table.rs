use std::fmt;

// 哲学者の id と表示名。シミュレーション中は読み取り専用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Philosopher {
    id: usize,
    name: String,
}

impl Philosopher {
    pub fn new(id: usize) -> Self {
        Philosopher {
            id,
            name: format!("Philosopher {id}"),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Philosopher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[NEW] {} (id={})", self.name, self.id)
    }
}

#[derive(Debug, Clone)]
pub struct DiningTable {
    philosophers: Vec<Philosopher>,
}

impl DiningTable {
    pub fn new(n: usize) -> Self {
        DiningTable {
            philosophers: (0..n).map(Philosopher::new).collect(),
        }
    }

    pub fn philosophers(&self) -> &[Philosopher] {
        &self.philosophers
    }

    pub fn len(&self) -> usize {
        self.philosophers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.philosophers.is_empty()
    }
}

impl fmt::Display for DiningTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Dining Table ===")?;
        for p in &self.philosophers {
            writeln!(f, "{p}")?;
        }
        write!(f, "====================")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table_ids() {
        let table = DiningTable::new(3);
        let ids: Vec<_> = table.philosophers().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(table.philosophers()[2].name(), "Philosopher 2");
    }

    #[test]
    fn test_show() {
        let shown = DiningTable::new(2).to_string();
        assert!(shown.contains("[NEW] Philosopher 0 (id=0)"));
        assert!(shown.contains("[NEW] Philosopher 1 (id=1)"));
    }
}
