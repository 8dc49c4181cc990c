#[cfg(test)]
mod tests {
    use crate::catalog::ColumnMap;
    use crate::condition::{Condition, Keyword, Operand};
    use crate::config::BuilderConfig;
    use crate::error::BuilderError;
    use crate::render::{Renderer, SqlParts};
    use crate::value::SqlValue;
    use crate::valuer::{SqlValuer, ValuerError};
    use pretty_assertions::assert_eq;

    struct Account;

    crate::sql_entity! {
        impl Account {
            table: Some("account"),
            props: [
                id:        { column: None,               sub_entity: false, transient: false },
                firstName: { column: Some("given_name"), sub_entity: false, transient: false },
                createdAt: { column: None,               sub_entity: false, transient: false },
                orders:    { column: None,               sub_entity: true,  transient: false },
            ]
        }
    }

    fn render(config: BuilderConfig, cond: &Condition) -> SqlParts {
        Renderer::new(config).render(cond).unwrap()
    }

    fn sql(config: BuilderConfig, cond: &Condition) -> String {
        render(config, cond).sql
    }

    fn s(v: &'static str) -> SqlValue {
        SqlValue::from(v)
    }

    #[test]
    fn comparison_positional_snake_lower() {
        let parts = render(
            BuilderConfig::snake_lower_positional(),
            &Condition::eq("id", 1),
        );
        assert_eq!(parts.sql, "id = ?");
        assert_eq!(parts.parameters, vec![SqlValue::I64(1)]);
    }

    #[test]
    fn comparison_named_uses_prop_as_key() {
        let parts = render(
            BuilderConfig::snake_lower_named(),
            &Condition::eq("firstName", "Jon"),
        );
        assert_eq!(parts.sql, "first_name = :firstName");
        assert_eq!(parts.parameters, vec![s("Jon")]);
    }

    #[test]
    fn junction_wraps_each_child() {
        let cond = Condition::and([Condition::eq("id", 1), Condition::eq("name", "x")]).unwrap();
        let parts = render(BuilderConfig::snake_lower_positional(), &cond);
        assert_eq!(parts.sql, "(id = ?) AND (name = ?)");
        assert_eq!(parts.parameters, vec![SqlValue::I64(1), s("x")]);
    }

    #[test]
    fn in_list_positional() {
        let parts = render(
            BuilderConfig::snake_lower_positional(),
            &Condition::in_("id", [1, 2, 3]),
        );
        assert_eq!(parts.sql, "id IN (?, ?, ?)");
        assert_eq!(
            parts.parameters,
            vec![SqlValue::I64(1), SqlValue::I64(2), SqlValue::I64(3)]
        );
    }

    #[test]
    fn in_list_keys_are_numbered_for_keyed_dialects() {
        let cond = Condition::in_("userId", [7, 8]);
        assert_eq!(
            sql(BuilderConfig::snake_lower_named(), &cond),
            "user_id IN (:userId1, :userId2)"
        );
        assert_eq!(
            sql(BuilderConfig::snake_upper_indexed(), &cond),
            "USER_ID IN (#{userId1}, #{userId2})"
        );
    }

    #[test]
    fn between_positional_and_named_keys() {
        let cond = Condition::between("age", 18, 65);
        let parts = render(BuilderConfig::snake_lower_positional(), &cond);
        assert_eq!(parts.sql, "age BETWEEN ? AND ?");
        assert_eq!(parts.parameters, vec![SqlValue::I64(18), SqlValue::I64(65)]);

        let parts = render(BuilderConfig::snake_lower_named(), &cond);
        assert_eq!(parts.sql, "age BETWEEN :minAge AND :maxAge");
        assert_eq!(parts.parameters, vec![SqlValue::I64(18), SqlValue::I64(65)]);

        assert_eq!(
            sql(
                BuilderConfig::snake_lower_indexed(),
                &Condition::not_between("createdAt", 1, 2)
            ),
            "created_at NOT BETWEEN #{minCreatedAt} AND #{maxCreatedAt}"
        );
    }

    #[test]
    fn empty_junction_fails_at_construction() {
        assert_eq!(
            Condition::and(Vec::new()),
            Err(BuilderError::EmptyJunction)
        );
        assert_eq!(Condition::or([]), Err(BuilderError::EmptyJunction));
    }

    #[test]
    fn singleton_junction_renders_like_its_child() {
        let child = Condition::eq("firstName", "Jon");
        let single = Condition::all_of(child.clone(), []);
        for config in [
            BuilderConfig::snake_lower_positional(),
            BuilderConfig::snake_upper_named(),
            BuilderConfig::camel_lower_literal(),
        ] {
            assert_eq!(render(config, &single), render(config, &child));
        }
    }

    #[test]
    fn junction_preserves_child_order() {
        let cond = crate::or![
            Condition::eq("c", 3),
            Condition::eq("a", 1),
            Condition::eq("b", 2),
        ];
        let parts = render(BuilderConfig::snake_lower_positional(), &cond);
        assert_eq!(parts.sql, "(c = ?) OR (a = ?) OR (b = ?)");
        assert_eq!(
            parts.parameters,
            vec![SqlValue::I64(3), SqlValue::I64(1), SqlValue::I64(2)]
        );
    }

    #[test]
    fn nested_junctions_keep_their_own_parens() {
        let cond = Condition::eq("a", 1).and_also(crate::or![
            Condition::eq("b", 2),
            Condition::eq("c", 3)
        ]);
        assert_eq!(
            sql(BuilderConfig::snake_lower_positional(), &cond),
            "(a = ?) AND ((b = ?) OR (c = ?))"
        );

        let flat = Condition::eq("a", 1)
            .and_also(Condition::eq("b", 2))
            .and_also(Condition::eq("c", 3));
        assert_eq!(
            sql(BuilderConfig::snake_lower_positional(), &flat),
            "(a = ?) AND (b = ?) AND (c = ?)"
        );
    }

    #[test]
    fn literal_dialect_inlines_values() {
        let cond = crate::and![
            Condition::eq("name", "O'Neil"),
            Condition::between("age", 18, 65),
            Condition::in_("kind", ["a", "b"]),
            Condition::eq("active", true),
        ];
        let parts = render(BuilderConfig::snake_lower_literal(), &cond);
        assert_eq!(
            parts.sql,
            r"(name = 'O\'Neil') AND (age BETWEEN 18 AND 65) AND (kind IN ('a', 'b')) AND (active = TRUE)"
        );
        assert!(parts.parameters.is_empty());
    }

    #[test]
    fn literal_datetime_at_upper_bound_does_not_overflow() {
        let at = time::macros::datetime!(9999-12-31 23:59:59.999999999 UTC);
        assert_eq!(
            sql(BuilderConfig::snake_lower_literal(), &Condition::eq("at", at)),
            "at = '9999-12-31 23:59:59.999999'"
        );
    }

    #[test]
    fn dotted_props_keep_their_path_in_keys() {
        let between = Condition::between("a.age", 18, 65);
        assert_eq!(
            sql(BuilderConfig::snake_lower_named(), &between),
            "a.age BETWEEN :minA.age AND :maxA.age"
        );
        assert_eq!(
            sql(BuilderConfig::snake_lower_indexed(), &between),
            "a.age BETWEEN #{minA.age} AND #{maxA.age}"
        );
        assert_eq!(
            sql(BuilderConfig::snake_lower_named(), &Condition::eq("a.id", 1)),
            "a.id = :a.id"
        );
    }

    #[test]
    fn empty_in_lists_render_constant_predicates() {
        let config = BuilderConfig::snake_lower_positional();
        let parts = render(config, &Condition::in_("id", Vec::<i64>::new()));
        assert_eq!(parts.sql, "0 = 1");
        assert!(parts.parameters.is_empty());
        assert_eq!(
            sql(config, &Condition::not_in("id", Vec::<i64>::new())),
            "0 = 0"
        );
    }

    #[test]
    fn null_checks_emit_no_parameters() {
        let parts = render(
            BuilderConfig::snake_upper_positional(),
            &Condition::is_null("deletedAt"),
        );
        assert_eq!(parts.sql, "DELETED_AT IS NULL");
        assert!(parts.parameters.is_empty());
        assert_eq!(
            sql(
                BuilderConfig::snake_lower_named(),
                &Condition::is_not_null("deletedAt")
            ),
            "deleted_at IS NOT NULL"
        );
    }

    #[test]
    fn nested_condition_operand_is_inlined() {
        let cond = Condition::gt("updatedAt", Operand::raw("createdAt"));
        for config in [
            BuilderConfig::snake_lower_positional(),
            BuilderConfig::snake_lower_named(),
            BuilderConfig::snake_lower_literal(),
        ] {
            let parts = render(config, &cond);
            assert_eq!(parts.sql, "updated_at > created_at");
            assert!(parts.parameters.is_empty());
        }
    }

    #[test]
    fn placeholder_operand_emits_without_parameter() {
        let cond = Condition::eq("id", Operand::Placeholder);
        let parts = render(BuilderConfig::snake_lower_positional(), &cond);
        assert_eq!(parts.sql, "id = ?");
        assert!(parts.parameters.is_empty());
        assert_eq!(sql(BuilderConfig::snake_lower_named(), &cond), "id = :id");
        assert_eq!(sql(BuilderConfig::snake_lower_literal(), &cond), "id = ?");
    }

    #[derive(Debug, Clone)]
    struct Version(Option<i64>);

    impl SqlValuer for Version {
        fn value(&self) -> Result<SqlValue, ValuerError> {
            self.0
                .map(SqlValue::I64)
                .ok_or_else(|| ValuerError("version not loaded".to_string()))
        }
    }

    #[test]
    fn valuer_is_evaluated_at_render_time() {
        let cond = Condition::eq("version", Operand::valuer(Version(Some(3))));
        let parts = render(BuilderConfig::snake_lower_named(), &cond);
        assert_eq!(parts.sql, "version = :version");
        assert_eq!(parts.parameters, vec![SqlValue::I64(3)]);

        let err = Renderer::new(BuilderConfig::snake_lower_named())
            .render(&Condition::eq("version", Operand::valuer(Version(None))))
            .unwrap_err();
        assert_eq!(
            err,
            BuilderError::Valuer(ValuerError("version not loaded".to_string()))
        );
    }

    #[test]
    fn raw_expression_substitutes_column_words_only() {
        let config = BuilderConfig::snake_lower_positional();
        assert_eq!(
            sql(config, &Condition::raw("UPPER(firstName) = 'X'")),
            "UPPER(first_name) = 'X'"
        );
        assert_eq!(
            sql(
                BuilderConfig::snake_upper_positional(),
                &Condition::raw("COUNT (*) > 1 AND createdAt IS NOT NULL")
            ),
            "COUNT (*) > 1 AND CREATED_AT IS NOT NULL"
        );
        // 名字紧跟括号即视为函数名，即使它本来是列名；隔了空白就按列名处理
        assert_eq!(
            sql(config, &Condition::raw("lastLogin(x) + 1")),
            "lastLogin(x) + 1"
        );
        assert_eq!(
            sql(config, &Condition::raw("lastLogin (x) + 1")),
            "last_login (x) + 1"
        );
        assert_eq!(
            sql(config, &Condition::raw("total >= :minTotal")),
            "total >= :minTotal"
        );
    }

    #[test]
    fn entity_override_wins_over_policy() {
        let parts = Renderer::new(BuilderConfig::snake_upper_named())
            .entity::<Account>()
            .render(&crate::and![
                Condition::eq("firstName", "Jon"),
                Condition::lt("createdAt", 5)
            ])
            .unwrap();
        assert_eq!(
            parts.sql,
            "(given_name = :firstName) AND (CREATED_AT < :createdAt)"
        );
    }

    #[test]
    fn explicit_column_map_and_aliases() {
        let columns: ColumnMap = [("firstName".to_string(), "custom_col".to_string())]
            .into_iter()
            .collect();
        let acct: ColumnMap = [("id".to_string(), "acct_id".to_string())]
            .into_iter()
            .collect();

        let renderer = Renderer::new(BuilderConfig::snake_lower_named())
            .column_map(columns)
            .alias("a", acct)
            .alias_entity::<Account>("acc");

        let parts = renderer
            .render(&crate::and![
                Condition::eq("firstName", "Jon"),
                Condition::eq("a.id", 1),
                Condition::eq("a.unknown", 2),
                Condition::eq("acc.firstName", "x"),
            ])
            .unwrap();
        assert_eq!(
            parts.sql,
            "(custom_col = :firstName) AND (a.acct_id = :a.id) AND (a.unknown = :a.unknown) AND (acc.given_name = :acc.firstName)"
        );
        assert_eq!(parts.parameters.len(), 4);
    }

    #[test]
    fn keyword_cells() {
        let config = BuilderConfig::snake_lower_positional();
        let cond = Condition::where_(crate::and![
            Condition::eq("id", 1),
            Condition::eq("firstName", "x")
        ]);
        assert_eq!(sql(config, &cond), " WHERE (id = ?) AND (first_name = ?)");
        assert_eq!(
            sql(config, &Condition::not(Condition::eq("id", 1))),
            " NOT (id = ?)"
        );
        assert_eq!(
            sql(config, &Condition::group_by(["firstName", "age"])),
            " GROUP BY first_name, age"
        );
        assert_eq!(
            sql(config, &Condition::using("accountId")),
            " USING (account_id)"
        );
        assert_eq!(
            sql(
                config,
                &Condition::cell(Keyword::Other("QUALIFY".into()), Condition::raw("rowNum = 1"))
            ),
            " QUALIFY row_num = 1"
        );
    }

    #[test]
    fn sub_queries_render_with_same_dialect() {
        let sub = Condition::sub_query::<Account>("id", Some(Condition::eq("firstName", "Jon")));
        let cond = Condition::in_sub_query("accountId", sub).unwrap();
        let parts = render(BuilderConfig::snake_lower_named(), &cond);
        assert_eq!(
            parts.sql,
            "account_id IN (SELECT id FROM account WHERE given_name = :firstName)"
        );
        assert_eq!(parts.parameters, vec![s("Jon")]);

        let cond = Condition::exists(Condition::sub_query_sql("SELECT 1 FROM dual"));
        assert_eq!(
            sql(BuilderConfig::snake_lower_positional(), &cond),
            " EXISTS (SELECT 1 FROM dual)"
        );
    }

    #[test]
    fn sub_query_projects_entity_columns_by_default() {
        let sub = Condition::sub_query::<Account>(Vec::<String>::new(), None);
        assert_eq!(
            sql(BuilderConfig::snake_lower_positional(), &sub),
            r#"SELECT id, given_name AS "firstName", created_at AS "createdAt" FROM account"#
        );
    }

    #[test]
    fn sub_query_over_plain_table() {
        let sub = Condition::sub_query_from(
            "order_line",
            ["orderId"],
            Some(Condition::where_(Condition::gt("qty", 0))),
        );
        let cond = Condition::not_in_sub_query("id", sub).unwrap();
        assert_eq!(
            sql(BuilderConfig::snake_lower_positional(), &cond),
            r#"id NOT IN (SELECT order_id AS "orderId" FROM order_line WHERE qty > ?)"#
        );

        let bare = Condition::sub_query_from("order_line", Vec::<String>::new(), None);
        assert_eq!(
            Renderer::new(BuilderConfig::snake_lower_positional()).render(&bare),
            Err(BuilderError::MissingSelectClause)
        );
    }

    #[test]
    fn in_sub_query_rejects_other_kinds() {
        assert_eq!(
            Condition::in_sub_query("id", Condition::eq("id", 1)),
            Err(BuilderError::UnsupportedConditionKind {
                kind: "Comparison",
                position: "IN sub query",
            })
        );
    }

    #[test]
    fn camel_lower_passes_camel_names_through() {
        let cond = crate::and![
            Condition::eq("firstName", 1),
            Condition::eq("LAST_NAME", 2),
            Condition::eq("*", 3),
        ];
        assert_eq!(
            sql(BuilderConfig::camel_lower_positional(), &cond),
            "(firstName = ?) AND (lastName = ?) AND (* = ?)"
        );
    }
}
